use crate::content::FrontMatterFormat;
use crate::error::{ContentError, ContentResult};

const BOM: char = '\u{feff}';

/// A content file cut in two: the metadata block and the untouched body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontMatter<'a> {
    pub format: FrontMatterFormat,
    pub block: &'a str,
    pub body: &'a str,
}

/// Lines of `text` as `(line_without_terminator, offset_of_next_line)`.
fn lines_with_offsets<'a>(text: &'a str) -> impl Iterator<Item = (&'a str, usize)> + 'a {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        offset += raw.len();
        (raw.trim_end_matches(['\n', '\r']), offset)
    })
}

/// Splits the first fenced block off `text`.
///
/// Blank lines before the opening fence are tolerated. The closing fence must repeat the
/// opening one. Anything after it, more fences included, belongs to the body.
pub fn split_front_matter(text: &str) -> ContentResult<FrontMatter<'_>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut lines = lines_with_offsets(text);

    let (format, block_start) = loop {
        match lines.next() {
            Some((line, _)) if line.trim().is_empty() => continue,
            Some((line, next)) => match FrontMatterFormat::from_fence(line.trim_end()) {
                Some(format) => break (format, next),
                None => return Err(ContentError::MissingFrontMatter),
            },
            None => return Err(ContentError::MissingFrontMatter),
        }
    };

    let mut line_start = block_start;
    for (line, next) in lines {
        if line.trim_end() == format.fence() {
            return Ok(FrontMatter {
                format,
                block: &text[block_start..line_start],
                body: &text[next..],
            });
        }
        line_start = next;
    }

    Err(ContentError::MalformedFrontMatter(format!("missing closing `{}` fence", format.fence())))
}
