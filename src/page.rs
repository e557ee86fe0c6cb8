//! Standalone HTML page wrapper.

use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Stylesheet embedded into standalone pages.
pub const STYLESHEET: &str = include_str!("../assets/markdown.css");

/// Wraps rendered note HTML in a complete document.
///
/// The stylesheet is inlined so the page has no external dependencies.
///
/// # Arguments
///
/// * `title`: Page title text
/// * `css`: Stylesheet content placed in a `<style>` element
/// * `body`: Sanitized note HTML
///
/// # Returns
///
/// Complete HTML document
pub fn page_wrapper(title: &str, css: &str, body: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                div class="container" {
                    article class="markdown-body" {
                        (PreEscaped(body))
                    }
                }
            }
        }
    }
}
