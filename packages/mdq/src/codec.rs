//! The JSON codec capability and the code-block post-processor that
//! invokes it during serialization.
//!
//! The core crate does not bake a JSON library in; it is injected by the
//! host through this trait. With the `json-codec` feature enabled, a
//! reference implementation backed by `serde_json` is available as
//! [`SerdeJsonCodec`].

/// A JSON pretty-printer/minifier, supplied by the host environment.
///
/// Both methods are fallible; on failure, the code block's original content
/// is emitted unchanged.
pub trait JsonCodec {
    /// Pretty-prints `text` as indented JSON, ending with a newline.
    fn pretty(&self, text: &str) -> Result<String, Box<dyn std::error::Error>>;
    /// Minifies `text` to single-line JSON, with no trailing newline.
    fn minify(&self, text: &str) -> Result<String, Box<dyn std::error::Error>>;
}

/// Language tags that trigger per-line minification (`jsonline(s)`/`json
/// line(s)`).
const JSON_LINES_TAGS: [&str; 4] = ["jsonline", "jsonlines", "json line", "json lines"];

/// Post-processes a fenced code block's body per its language tag.
/// Languages outside the five recognized tags, or any tag when no codec is
/// supplied, pass through verbatim.
pub fn process_code_body(language: &str, content: &str, codec: Option<&dyn JsonCodec>) -> String {
    let Some(codec) = codec else {
        return content.to_string();
    };

    if language == "json" {
        match codec.pretty(content) {
            Ok(pretty) => return pretty,
            Err(_) => return content.to_string(),
        }
    }

    if JSON_LINES_TAGS.contains(&language) {
        let mut out = String::with_capacity(content.len());
        for line in content.lines() {
            if line.trim().is_empty() {
                out.push_str(line);
            } else {
                match codec.minify(line) {
                    Ok(minified) => out.push_str(&minified),
                    Err(_) => out.push_str(line),
                }
            }
            out.push('\n');
        }
        return out;
    }

    content.to_string()
}

#[cfg(feature = "json-codec")]
mod serde_json_codec {
    use super::JsonCodec;

    /// A reference [`JsonCodec`] backed by `serde_json`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SerdeJsonCodec;

    impl JsonCodec for SerdeJsonCodec {
        fn pretty(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
            let value: serde_json::Value = serde_json::from_str(text)?;
            let mut pretty = serde_json::to_string_pretty(&value)?;
            pretty.push('\n');
            Ok(pretty)
        }
        fn minify(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
            let value: serde_json::Value = serde_json::from_str(text)?;
            Ok(serde_json::to_string(&value)?)
        }
    }
}
#[cfg(feature = "json-codec")]
pub use serde_json_codec::SerdeJsonCodec;
