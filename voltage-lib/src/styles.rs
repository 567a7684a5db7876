//! Global stylesheet for the modal trigger button.
//!
//! The stylesheet is installed once per document. The element id is the
//! registry key: installing again is a no-op, so the first mounted modal's
//! appearance themes every trigger on the page.

use crate::dom::Dom;
use crate::types::AppearanceConfig;
use crate::Result;

/// Element id of the injected `<style>` block.
pub const TRIGGER_STYLESHEET_ID: &str = "voltage-modal-trigger-styles";

pub const DEFAULT_PRIMARY_COLOR: &str = "#f7931a";
pub const DEFAULT_BORDER_RADIUS: &str = "8px";
pub const DEFAULT_FONT_FAMILY: &str = "system-ui, sans-serif";

/// Install the trigger stylesheet unless the document already has it.
///
/// Returns true when this call inserted it.
pub fn ensure_trigger_styles<D: Dom>(dom: &D, appearance: &AppearanceConfig) -> Result<bool> {
    if dom.contains_id(TRIGGER_STYLESHEET_ID) {
        return Ok(false);
    }
    dom.install_style(TRIGGER_STYLESHEET_ID, &trigger_css(appearance))?;
    Ok(true)
}

/// Render the trigger rules for `appearance`.
pub fn trigger_css(appearance: &AppearanceConfig) -> String {
    let primary = appearance
        .primary_color
        .as_deref()
        .unwrap_or(DEFAULT_PRIMARY_COLOR);
    let radius = appearance
        .border_radius
        .as_deref()
        .unwrap_or(DEFAULT_BORDER_RADIUS);
    let font = appearance
        .font_family
        .as_deref()
        .unwrap_or(DEFAULT_FONT_FAMILY);

    format!(
        r#".voltage-modal-trigger {{
  display: inline-flex;
  align-items: center;
  gap: 0.5rem;
  padding: 0.75rem 1.5rem;
  background: {primary};
  color: white;
  border: none;
  border-radius: {radius};
  font-family: {font};
  font-size: 1rem;
  font-weight: 600;
  cursor: pointer;
  transition: all 150ms ease-in-out;
  text-decoration: none;
  box-shadow: 0 1px 2px 0 rgba(0, 0, 0, 0.05);
}}

.voltage-modal-trigger:hover {{
  opacity: 0.9;
  transform: translateY(-1px);
  box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1);
}}

.voltage-modal-trigger:active {{
  transform: translateY(0);
}}

.voltage-modal-trigger:focus {{
  outline: 2px solid {primary};
  outline-offset: 2px;
}}

.voltage-modal-trigger-icon {{
  flex-shrink: 0;
}}

.voltage-modal-trigger-text {{
  white-space: nowrap;
}}

@media (prefers-color-scheme: dark) {{
  .voltage-modal-trigger {{
    box-shadow: 0 1px 2px 0 rgba(0, 0, 0, 0.3);
  }}

  .voltage-modal-trigger:hover {{
    box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.3);
  }}
}}

@media (max-width: 640px) {{
  .voltage-modal-trigger {{
    padding: 0.625rem 1.25rem;
    font-size: 0.875rem;
  }}
}}
"#
    )
}
