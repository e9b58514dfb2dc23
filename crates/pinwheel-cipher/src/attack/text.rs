//! Aligned known text
//!
//! Plaintext and ciphertext are walked in lockstep with line breaks removed,
//! so position `n` is the `n`-th enciphered symbol: the `n`-th step of every
//! wheel. A `-` on either side is a gap: the position still counts, but there
//! is nothing to observe there.

use crate::alphabet::{self, Code, GAP};
use crate::{Error, Result};

/// Plaintext/ciphertext codes at one text position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub plain: Code,
    pub cipher: Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownText {
    pairs: Vec<Option<Pair>>,
}

impl KnownText {
    pub fn align(plaintext: &str, ciphertext: &str) -> Result<Self> {
        let plain = parse_side(plaintext)?;
        let cipher = parse_side(ciphertext)?;
        if plain.len() != cipher.len() {
            return Err(Error::MisalignedText {
                plaintext: plain.len(),
                ciphertext: cipher.len(),
            });
        }

        let pairs = plain.into_iter().zip(cipher).map(pair).collect();
        Ok(Self { pairs })
    }

    /// Known text from a per-line crib: every ciphertext line opens with
    /// `header` and closes with `trailer`, and the plaintext between is unknown.
    /// Empty lines are skipped.
    pub fn crib(ciphertext: &str, header: &str, trailer: &str) -> Result<Self> {
        let header = parse_side(header)?;
        let trailer = parse_side(trailer)?;
        let fixed = header.len() + trailer.len();

        let mut pairs = Vec::new();
        let mut lines = 0;
        for line in ciphertext.lines().filter(|l| !l.is_empty()) {
            let cipher = parse_side(line)?;
            if cipher.len() < fixed {
                return Err(Error::MisalignedText {
                    plaintext: fixed,
                    ciphertext: cipher.len(),
                });
            }
            let gap = cipher.len() - fixed;
            let plain = header
                .iter()
                .copied()
                .chain(std::iter::repeat(None).take(gap))
                .chain(trailer.iter().copied());
            pairs.extend(plain.zip(cipher).map(pair));
            lines += 1;
        }
        tracing::debug!("crib covers {} lines, {} positions", lines, pairs.len());
        Ok(Self { pairs })
    }

    /// Number of text positions, gaps included
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<Pair> {
        self.pairs.get(position).copied().flatten()
    }

    /// `(position, pair)` for every position, gaps as `None`
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<Pair>)> + '_ {
        self.pairs.iter().copied().enumerate()
    }

    /// Positions with an observation
    pub fn known(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_some()).count()
    }
}

fn pair((plain, cipher): (Option<Code>, Option<Code>)) -> Option<Pair> {
    Some(Pair {
        plain: plain?,
        cipher: cipher?,
    })
}

fn parse_side(text: &str) -> Result<Vec<Option<Code>>> {
    text.chars()
        .filter(|&c| !alphabet::is_line_break(c))
        .map(|c| {
            if c == GAP {
                Ok(None)
            } else {
                alphabet::encode(c).map(Some)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, Cipher, KeyConfig};

    #[test]
    fn test_align_skips_line_breaks() {
        let text = KnownText::align("AT\r\n2", "7\nQE").unwrap();
        assert_eq!(text.len(), 3);
        assert_eq!(text.get(0), Some(Pair { plain: 24, cipher: 31 }));
        assert_eq!(text.get(2), Some(Pair { plain: 0, cipher: 16 }));
    }

    #[test]
    fn test_gaps_keep_positions() {
        let text = KnownText::align("UM--4", "KQ-X-").unwrap();
        assert_eq!(text.len(), 5);
        assert_eq!(text.known(), 2);
        assert_eq!(text.get(2), None);
        assert_eq!(text.get(3), None);
        assert_eq!(text.get(4), None);
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            KnownText::align("ABC", "AB"),
            Err(Error::MisalignedText { plaintext: 3, ciphertext: 2 })
        );
    }

    #[test]
    fn test_empty_text() {
        let text = KnownText::align("", "\n").unwrap();
        assert!(text.is_empty());
        assert_eq!(text.known(), 0);
    }

    #[test]
    fn test_crib_masks_line_bodies() {
        let plaintext = "UMUM4VEVE35KING4HENRY35\nUMUM4VEVE35IV35";
        let ciphertext = Cipher::new(KeyConfig::reference().build().unwrap())
            .encrypt_stream(plaintext)
            .unwrap();

        let crib = KnownText::crib(&ciphertext, "UMUM4VEVE35", "35").unwrap();
        let masked = KnownText::align("UMUM4VEVE35----------35\nUMUM4VEVE35--35", &ciphertext).unwrap();
        assert_eq!(crib, masked);
        assert_eq!(crib.len(), 38);
        assert_eq!(crib.known(), 26);
        assert_eq!(crib.get(11), None);
        assert_eq!(crib.get(21).map(|p| p.plain), Some(encode('3').unwrap()));
    }

    #[test]
    fn test_crib_skips_empty_lines() {
        let crib = KnownText::crib("AB\n\nCD\n", "Q", "E").unwrap();
        assert_eq!(crib.len(), 4);
        assert_eq!(crib.get(2), Some(Pair { plain: encode('Q').unwrap(), cipher: encode('C').unwrap() }));
    }

    #[test]
    fn test_crib_line_too_short() {
        assert_eq!(
            KnownText::crib("UMUM4VEVE35\nUMUM", "UMUM4VEVE35", "35"),
            Err(Error::MisalignedText { plaintext: 13, ciphertext: 11 })
        );
    }

    #[test]
    fn test_invalid_symbol() {
        assert_eq!(KnownText::align("A B", "ABC"), Err(Error::InvalidSymbol(' ')));
    }
}
