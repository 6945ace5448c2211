//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation on a char boundary.
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  let total = s.chars().count();
  if total <= max_chars {
    s.to_string()
  } else {
    format!("{}… ({} chars total)", s.chars().take(max_chars).collect::<String>(), total)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_keys() {
    let out = fill_template("{a} + {b} = {a}{b}", &[("a", "1"), ("b", "2")]);
    assert_eq!(out, "1 + 2 = 12");
  }

  #[test]
  fn fill_template_leaves_unknown_and_json_braces() {
    assert_eq!(fill_template(r#"{"title": {x}}"#, &[("title", "t")]), r#"{"title": {x}}"#);
  }

  #[test]
  fn trunc_keeps_char_boundaries() {
    assert_eq!(trunc_for_log("Số 63", 10), "Số 63");
    assert_eq!(trunc_for_log("Số 63", 2), "Số… (5 chars total)");
  }
}
