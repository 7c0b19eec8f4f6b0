use std::collections::BTreeSet;

use crate::model::OptionKey;

//
// ─── NUMERIC INPUT ─────────────────────────────────────────────────────────────
//

/// Character-filtered numeric entry.
///
/// The permitted grammar is an optional leading minus sign, digits, and at
/// most one decimal point. `push` silently drops anything that would leave
/// the buffer outside that grammar; the previously valid value is retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericInput(String);

impl NumericInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an entry by pushing each character of `raw` through the filter.
    #[must_use]
    pub fn filtered(raw: impl AsRef<str>) -> Self {
        let mut input = Self::new();
        for ch in raw.as_ref().chars() {
            input.push(ch);
        }
        input
    }

    /// Append one character if the result still matches the numeric grammar.
    ///
    /// Returns true when the character was accepted.
    pub fn push(&mut self, ch: char) -> bool {
        let accepted = match ch {
            '0'..='9' => true,
            '-' => self.0.is_empty(),
            '.' => !self.0.contains('.'),
            _ => false,
        };
        if accepted {
            self.0.push(ch);
        }
        accepted
    }

    /// Remove the last character, if any.
    pub fn pop(&mut self) -> Option<char> {
        self.0.pop()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the entry as a floating-point value.
    ///
    /// Returns `None` for entries that are not a complete number (empty,
    /// `"-"`, `"."`), which scoring treats as incorrect.
    #[must_use]
    pub fn parse(&self) -> Option<f64> {
        self.0.parse::<f64>().ok()
    }
}

//
// ─── USER ANSWER ───────────────────────────────────────────────────────────────
//

/// The learner's recorded answer for one question.
///
/// At most one slot is ever held; re-recording overwrites it. Absence of an
/// entry in the session's answer map means "not answered".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAnswer {
    Single(OptionKey),
    Multi(BTreeSet<OptionKey>),
    Numeric(NumericInput),
}

impl UserAnswer {
    #[must_use]
    pub fn single(key: impl Into<OptionKey>) -> Self {
        Self::Single(key.into())
    }

    #[must_use]
    pub fn multi<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<OptionKey>,
    {
        Self::Multi(keys.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn numeric(raw: impl AsRef<str>) -> Self {
        Self::Numeric(NumericInput::filtered(raw))
    }

    /// Selected keys of a multi-choice answer.
    #[must_use]
    pub fn selected_keys(&self) -> Option<&BTreeSet<OptionKey>> {
        match self {
            UserAnswer::Multi(keys) => Some(keys),
            _ => None,
        }
    }

    /// True when the answer carries no usable content (an emptied multi
    /// selection or an empty numeric buffer).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            UserAnswer::Single(_) => false,
            UserAnswer::Multi(keys) => keys.is_empty(),
            UserAnswer::Numeric(input) => input.is_empty(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_decimal_point_is_rejected() {
        let mut input = NumericInput::new();
        assert!(input.push('4'));
        assert!(input.push('.'));
        assert!(input.push('5'));
        assert!(!input.push('.'));
        assert_eq!(input.as_str(), "4.5");
        assert_eq!(input.parse(), Some(4.5));
    }

    #[test]
    fn minus_only_allowed_first() {
        let mut input = NumericInput::new();
        assert!(input.push('-'));
        assert!(input.push('3'));
        assert!(!input.push('-'));
        assert_eq!(input.as_str(), "-3");
        assert_eq!(input.parse(), Some(-3.0));
    }

    #[test]
    fn letters_are_dropped() {
        let input = NumericInput::filtered("1a2b.c3");
        assert_eq!(input.as_str(), "12.3");
    }

    #[test]
    fn incomplete_entry_does_not_parse() {
        assert_eq!(NumericInput::filtered("-").parse(), None);
        assert_eq!(NumericInput::filtered(".").parse(), None);
        assert_eq!(NumericInput::new().parse(), None);
    }

    #[test]
    fn backspace_pops_last_char() {
        let mut input = NumericInput::filtered("12");
        assert_eq!(input.pop(), Some('2'));
        assert_eq!(input.as_str(), "1");
    }

    #[test]
    fn blank_detection() {
        assert!(UserAnswer::multi(Vec::<OptionKey>::new()).is_blank());
        assert!(UserAnswer::Numeric(NumericInput::new()).is_blank());
        assert!(!UserAnswer::single("A").is_blank());
    }
}
