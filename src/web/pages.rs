//! Landing page rendering.

use serde::Serialize;

/// Tune preloaded into the input box.
const STARTER_TUNE: &str = "X: 1\nT: Sketch\nK: C\nL: 1/4\nM: 4/4\n| A B c d |]";

/// Values interpolated into the landing page template.
#[derive(Serialize)]
struct IndexContext {
    version: String,
    starter_tune: String,
}

/// Render the landing page. Called once at startup.
pub fn render_index() -> Result<String, String> {
    let template = mustache::compile_str(include_str!("templates/index.html.mustache"))
        .map_err(|e| format!("landing page template failed to compile: {}", e))?;
    let context = IndexContext {
        version: env!("CARGO_PKG_VERSION").to_string(),
        starter_tune: STARTER_TUNE.to_string(),
    };
    template
        .render_to_string(&context)
        .map_err(|e| format!("landing page template failed to render: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_renders_with_starter_tune() {
        let html = render_index().unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("T: Sketch"));
        assert!(html.contains(env!("CARGO_PKG_VERSION")));
        assert!(html.contains("hasPickup"));
    }
}
