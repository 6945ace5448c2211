//! Text helpers that reduce raw answers to a comparable form.

/// Sentence punctuation that may trail an answer ("50.", "63!").
const TRAILING_PUNCT: [char; 4] = ['.', ',', ';', '!'];

/// Lowercase, drop trailing `.,;!` and trim surrounding whitespace.
///
/// Trailing punctuation and whitespace are removed as one run, so
/// `"50. "` and `"50 ."` both become `"50"`. Internal punctuation is kept.
pub fn normalize(text: &str) -> String {
  text
    .to_lowercase()
    .trim_end_matches(|c: char| c.is_whitespace() || TRAILING_PUNCT.contains(&c))
    .trim_start()
    .to_string()
}

/// Every maximal run of ASCII digits, left to right, kept as text.
pub fn extract_numbers(text: &str) -> Vec<&str> {
  let mut out = Vec::new();
  let mut start: Option<usize> = None;
  for (i, ch) in text.char_indices() {
    match (ch.is_ascii_digit(), start) {
      (true, None) => start = Some(i),
      (false, Some(s)) => {
        out.push(&text[s..i]);
        start = None;
      }
      _ => {}
    }
  }
  if let Some(s) = start {
    out.push(&text[s..]);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_strips_only_trailing_punctuation() {
    assert_eq!(normalize("50."), "50");
    assert_eq!(normalize("50"), "50");
    assert_eq!(normalize("A, B"), "a, b");
    assert_eq!(normalize("  Số 63!!  "), "số 63");
    assert_eq!(normalize("1.5 kg;"), "1.5 kg");
    assert_eq!(normalize(""), "");
    assert_eq!(normalize(" .,; "), "");
  }

  #[test]
  fn normalize_is_idempotent() {
    for s in ["50. ", "a. .", "  Hello, World!  ", "Có 5 quả táo.", "", "!!", "x ,y ; "] {
      let once = normalize(s);
      assert_eq!(normalize(&once), once, "input {s:?}");
    }
  }

  #[test]
  fn extract_numbers_in_order() {
    assert_eq!(extract_numbers("Có 5 quả táo và 3 quả cam"), vec!["5", "3"]);
    assert_eq!(extract_numbers("12cm"), vec!["12"]);
    assert_eq!(extract_numbers("007 và 10"), vec!["007", "10"]);
    assert_eq!(extract_numbers("1.5"), vec!["1", "5"]);
    assert!(extract_numbers("không có số").is_empty());
    assert!(extract_numbers("").is_empty());
  }
}
