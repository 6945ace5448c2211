//! Ordered answer-matching rules.
//!
//! Each question type has a fixed list of rules evaluated in order; the first
//! rule that accepts the answer decides the verdict. Rules are pure and total,
//! so every answer gets a verdict no matter how the answer key is formatted.
//!
//! Multiple choice: letter prefix, then option text, option numbers
//! (element-wise) and containment.
//! Free text: normalized equality, then digits (concatenated) and containment.

use once_cell::sync::Lazy;
use regex::Regex;

use super::text::{extract_numbers, normalize};

/// Leading option label such as "A." or "B) ".
static OPTION_LABEL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[A-D][.)]\s*").expect("option label pattern is valid"));

/// One answer to judge, borrowed from the question and the submission.
#[derive(Clone, Copy, Debug)]
pub struct AnswerCase<'a> {
  pub user: &'a str,
  pub correct: &'a str,
  pub options: &'a [String],
}

#[derive(Clone, Copy)]
pub struct Rule {
  pub name: &'static str,
  pub accepts: fn(&AnswerCase<'_>) -> bool,
}

pub const MULTIPLE_CHOICE_RULES: &[Rule] = &[
  Rule { name: "letter_prefix", accepts: letter_prefix },
  Rule { name: "option_text", accepts: option_text },
  Rule { name: "option_numbers", accepts: option_numbers },
  Rule { name: "option_contains", accepts: option_contains },
];

pub const FREE_TEXT_RULES: &[Rule] = &[
  Rule { name: "exact", accepts: exact },
  Rule { name: "digits", accepts: digits_concat },
  Rule { name: "contains", accepts: contains },
];

/// Name of the first rule that accepts the case, if any.
pub fn first_match(rules: &[Rule], case: &AnswerCase<'_>) -> Option<&'static str> {
  rules.iter().find(|r| (r.accepts)(case)).map(|r| r.name)
}

/// Drop a leading "A."/"A)" style label and surrounding whitespace.
pub fn strip_option_label(text: &str) -> &str {
  let text = text.trim();
  match OPTION_LABEL.find(text) {
    Some(m) => text[m.end()..].trim(),
    None => text,
  }
}

/// Zero-based option index for a submitted letter ('a'/'A' -> 0).
pub fn option_index(user: &str) -> Option<usize> {
  let first = user.trim().chars().next()?.to_lowercase().next()?;
  (first as u32).checked_sub('a' as u32).map(|i| i as usize)
}

// -------- multiple choice --------

fn letter_prefix(c: &AnswerCase<'_>) -> bool {
  let user = c.user.trim().to_lowercase();
  if user.is_empty() {
    return false;
  }
  let correct = c.correct.trim().to_lowercase();
  correct == user
    || correct.starts_with(&format!("{user}."))
    || correct.starts_with(&format!("{user})"))
}

/// Normalized (selected option text, answer-key text), or None if the
/// submitted letter does not name an option.
fn selected_pair(c: &AnswerCase<'_>) -> Option<(String, String)> {
  let option = c.options.get(option_index(c.user)?)?;
  Some((normalize(strip_option_label(option)), normalize(strip_option_label(c.correct))))
}

fn option_text(c: &AnswerCase<'_>) -> bool {
  selected_pair(c).is_some_and(|(selected, correct)| selected == correct)
}

fn option_numbers(c: &AnswerCase<'_>) -> bool {
  selected_pair(c).is_some_and(|(selected, correct)| {
    let a = extract_numbers(&selected);
    let b = extract_numbers(&correct);
    !a.is_empty() && !b.is_empty() && a == b
  })
}

fn option_contains(c: &AnswerCase<'_>) -> bool {
  selected_pair(c).is_some_and(|(selected, correct)| mutual_contains(&selected, &correct))
}

// -------- free text --------

fn exact(c: &AnswerCase<'_>) -> bool {
  normalize(c.user) == normalize(c.correct)
}

/// Looser than `option_numbers`: digit runs are joined before comparing,
/// so ["1", "23"] and ["12", "3"] are considered equal.
fn digits_concat(c: &AnswerCase<'_>) -> bool {
  let user = normalize(c.user);
  let correct = normalize(c.correct);
  let a = extract_numbers(&user);
  let b = extract_numbers(&correct);
  !a.is_empty() && !b.is_empty() && a.concat() == b.concat()
}

/// A blank answer never wins by containment; it only matches a blank key.
fn contains(c: &AnswerCase<'_>) -> bool {
  let user = normalize(c.user);
  !user.is_empty() && mutual_contains(&user, &normalize(c.correct))
}

fn mutual_contains(a: &str, b: &str) -> bool {
  a.contains(b) || b.contains(a)
}
