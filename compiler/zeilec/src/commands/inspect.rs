//! The `inspect` command: list the story inside a container file.

use zeile_codec::CodecError;

/// How `inspect` prints a decoded story.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum InspectFormat {
    /// Header lines followed by the plain-text listing.
    #[default]
    Listing,
    /// The indented outline from [`zeile_ir::StoryIr::to_sirius`].
    Sirius,
}

/// Locale and action counts followed by the plain-text listing. The second
/// count includes nested actions.
pub fn render_container(bytes: &[u8]) -> Result<String, CodecError> {
    render_container_as(bytes, InspectFormat::Listing)
}

pub fn render_container_as(bytes: &[u8], format: InspectFormat) -> Result<String, CodecError> {
    let story = zeile_codec::decode(bytes)?;
    Ok(match format {
        InspectFormat::Listing => format!(
            "; locale: {}\n; actions: {} ({} total)\n{}",
            story.locale(),
            story.actions().len(),
            story.deep_count(),
            story.to_plain_text()
        ),
        InspectFormat::Sirius => story.to_sirius(),
    })
}

pub fn inspect_container(path: &str, format: InspectFormat) {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: cannot read '{path}': {e}");
            std::process::exit(1);
        }
    };
    match render_container_as(&bytes, format) {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("error: '{path}' is not a story container: {e}");
            std::process::exit(1);
        }
    }
}
