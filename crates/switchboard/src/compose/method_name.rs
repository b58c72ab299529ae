/*! Listener method names derived from event names. */

/// `prefix` followed by `event` with every word-initial letter upper-cased and
/// everything but ASCII letters and digits removed.
///
/// Word characters are ASCII letters, digits and `_`, so a letter only starts a
/// word at the beginning or after any other character.
///
/// ```
/// use switchboard::compose::derive_method_name;
///
/// assert_eq!(derive_method_name("on", "kernel.request"), "onKernelRequest");
/// assert_eq!(derive_method_name("on", "user_login"), "onUserlogin");
/// ```
pub fn derive_method_name(prefix: &str, event: &str) -> String {
  let mut name = String::with_capacity(prefix.len() + event.len());
  name.push_str(prefix);

  let mut after_word_char = false;
  for c in event.chars() {
    if c.is_ascii_alphanumeric() {
      name.push(if after_word_char { c } else { c.to_ascii_uppercase() });
    }
    after_word_char = c.is_ascii_alphanumeric() || c == '_';
  }
  name
}
