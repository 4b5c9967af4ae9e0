use elbi_core::error::{Error, Result};
use elbi_core::types::{BackendResponse, RenderedDiagram};

/// Normalizes whatever the library returned into markup plus bind hook.
///
/// Empty markup and unrecognized shapes are failures.
pub fn normalize(response: BackendResponse) -> Result<RenderedDiagram> {
    let (svg, bind) = match response {
        BackendResponse::Markup(svg) => (Some(svg), None),
        BackendResponse::Object { svg, bind_functions } => (svg, bind_functions),
        BackendResponse::Unrecognized(shape) => {
            return Err(Error::Render(format!("Unexpected render result: {shape}")));
        }
    };
    match svg {
        Some(svg) if !svg.trim().is_empty() => Ok(RenderedDiagram { svg, bind }),
        _ => Err(Error::Render("render returned empty SVG".to_string())),
    }
}
