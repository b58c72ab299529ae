/*!
Configuration for the composition pass.

All values have sensible defaults. Create a custom config to override:

```ignore
use switchboard::{Config, Dispatcher};

let config = Config {
    derive_method_names: false,
    ..Default::default()
};

let dispatcher = Dispatcher::builder(locator).config(config).build()?;
```
*/

/// Composition configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Derive a listener method from the event name when a listener
  /// declaration leaves it out. When false, a missing method is a
  /// configuration error.
  /// Default: true.
  pub derive_method_names: bool,

  /// Prefix of derived method names (`kernel.request` → `onKernelRequest`).
  /// Default: `"on"`.
  pub method_prefix: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      derive_method_names: true,
      method_prefix: "on".to_owned(),
    }
  }
}

impl Config {
  /// Create a new config with default values.
  pub fn new() -> Self {
    Self::default()
  }
}
