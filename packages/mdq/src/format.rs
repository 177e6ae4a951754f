//! Output configuration.
//!
//! `FormatCfg` is, today, a placeholder: it carries no fields that change
//! observable output. It exists so that every [`crate::build`] call already
//! threads a configuration value through, leaving room to add output-style
//! options (atx vs setext, table minification, and so on) later without an
//! API break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatCfg {
    _reserved: (),
}
