/*!
An iterator over a generalised luby sequence.

The luby sequence is 1, 1, 2, 1, 1, 2, 4, 1, …, see <https://oeis.org/A182105>.
The generalised sequence replaces each power of two 2ⁱ with bⁱ for some base b, so the classic sequence has base 2.

The position within the sequence is tracked with the bit trick of [chaotic-evil](https://gitlab.com/chaotic-evil)'s [implementation](https://gitlab.com/chaotic-evil/luby), and the exponent is read from the power of two reached.
*/

/// A generalised luby sequence.
pub struct Luby {
    base: f64,
    curr: u32,
    next: u32,
}

impl Luby {
    /// The sequence with the given base, positioned before the first element.
    pub fn with_base(base: f64) -> Self {
        Luby {
            base,
            curr: 0,
            next: 0,
        }
    }

    /// The count of complete runs of the sequence passed.
    pub fn current(&self) -> u32 {
        self.curr
    }
}

impl Default for Luby {
    fn default() -> Self {
        Luby::with_base(2.0)
    }
}

impl Iterator for Luby {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.curr & self.curr.wrapping_neg() == self.next {
            self.curr = self.curr.checked_add(1)?;
            self.next = 1;
        } else {
            self.next = self.next.checked_add(self.next)?;
        }

        Some(self.base.powi(self.next.trailing_zeros() as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://oeis.org/A182105
    const LUBY_SLICE: &[u32] = &[
        1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8,
        16, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4,
        8, 16, 32, 1, 1, 2,
    ];

    #[test]
    fn classic() {
        let mut l = Luby::default();
        for known_value in LUBY_SLICE {
            assert_eq!(l.next(), Some(*known_value as f64))
        }
    }

    #[test]
    fn base_three() {
        let l = Luby::with_base(3.0);
        let expected = LUBY_SLICE
            .iter()
            .map(|v| 3.0_f64.powi(v.trailing_zeros() as i32));
        for (value, known) in l.zip(expected) {
            assert_eq!(value, known);
        }
    }
}
