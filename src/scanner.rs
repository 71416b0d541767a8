use tracing::{debug, trace};

use crate::bind::ScanResult;
use crate::error::{DecodeError, Error, Result};
use crate::options::ScanOptions;
use crate::value::{Value, Verb};

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    Placeholder(Verb),
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    /// Byte offset of the segment in the template source.
    start: usize,
    piece: Piece,
}

/// A compiled template.
///
/// Compiling splits the template into literal runs and placeholders once, so
/// the same template can be scanned against many subjects.
///
/// ```rust
/// use scan_rust::Template;
///
/// let template = Template::compile("Room %d").unwrap();
/// assert_eq!(template.scan("Room 101").get(0).and_then(|v| v.as_int()), Some(101));
/// assert_eq!(template.scan("Room 202").get(0).and_then(|v| v.as_int()), Some(202));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    marker: char,
    segments: Vec<Segment>,
    placeholders: usize,
}

enum State<'t> {
    Literal(&'t str),
    Placeholder(Verb),
    Done,
    Failed(Error),
}

impl Template {
    pub fn compile(template: &str) -> Result<Self> {
        Self::with_options(template, &ScanOptions::default())
    }

    #[tracing::instrument(level = "debug", skip(options), fields(marker = %options.marker))]
    pub fn with_options(template: &str, options: &ScanOptions) -> Result<Self> {
        let marker = options.marker;
        let mut segments = Vec::new();
        let mut placeholders = 0;
        let mut literal = String::new();
        let mut literal_start = 0;
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if c != marker {
                if literal.is_empty() {
                    literal_start = pos;
                }
                literal.push(c);
                continue;
            }

            let verb = match chars.next() {
                Some((_, v)) => Verb::from_char(v).ok_or_else(|| Error::UnknownVerb {
                    template: template.to_string(),
                    position: pos,
                    verb: Some(v),
                })?,
                None => {
                    return Err(Error::UnknownVerb {
                        template: template.to_string(),
                        position: pos,
                        verb: None,
                    })
                }
            };
            if let Some(&(next, _)) = chars.peek().filter(|&&(_, n)| n == marker) {
                return Err(Error::AmbiguousFormat {
                    template: template.to_string(),
                    position: next,
                });
            }

            if !literal.is_empty() {
                segments.push(Segment {
                    start: literal_start,
                    piece: Piece::Literal(std::mem::take(&mut literal)),
                });
            }
            segments.push(Segment {
                start: pos,
                piece: Piece::Placeholder(verb),
            });
            placeholders += 1;
        }
        if !literal.is_empty() {
            segments.push(Segment {
                start: literal_start,
                piece: Piece::Literal(literal),
            });
        }

        debug!(segments = segments.len(), placeholders, "compiled template");
        Ok(Template {
            source: template.to_string(),
            marker,
            segments,
            placeholders,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    /// The verbs of the template's placeholders, in order.
    pub fn verbs(&self) -> impl Iterator<Item = Verb> + '_ {
        self.segments.iter().filter_map(|s| match s.piece {
            Piece::Placeholder(verb) => Some(verb),
            Piece::Literal(_) => None,
        })
    }

    /// Walk the template and `subject` in lockstep and decode every placeholder.
    ///
    /// The walk is greedy and never backtracks: each placeholder ends where the
    /// literal text following it first occurs. Text left over in `subject`
    /// after the last template segment is ignored.
    #[tracing::instrument(level = "trace", skip_all, fields(template = %self.source))]
    pub fn scan(&self, subject: &str) -> ScanResult {
        let mut values: Vec<Value> = Vec::with_capacity(self.placeholders);
        let mut index = 0;
        let mut cursor = 0;
        let mut state = self.state_at(index);

        loop {
            state = match state {
                State::Literal(text) => {
                    let rest = &subject[cursor..];
                    if rest.starts_with(text) {
                        cursor += text.len();
                        index += 1;
                        self.state_at(index)
                    } else {
                        State::Failed(self.mismatch(subject, text, rest))
                    }
                }
                State::Placeholder(verb) => {
                    let rest = &subject[cursor..];
                    let decoded = locate_literal(self.fragment_after(index), rest)
                        .and_then(|capture| verb.decode(capture).map(|v| (capture.len(), v)));
                    match decoded {
                        Ok((width, value)) => {
                            trace!(verb = %verb.as_char(), width, %value, "captured");
                            values.push(value);
                            cursor += width;
                            index += 1;
                            self.state_at(index)
                        }
                        Err(source) => State::Failed(Error::Placeholder {
                            marker: format!("{}{}", self.marker, verb.as_char()),
                            template: self.source[self.segments[index].start..].to_string(),
                            subject: rest.to_string(),
                            source,
                        }),
                    }
                }
                State::Done => return ScanResult::from(Ok(values)),
                State::Failed(err) => {
                    debug!(%err, "scan failed");
                    return ScanResult::from(Err(err));
                }
            };
        }
    }

    fn state_at(&self, index: usize) -> State<'_> {
        match self.segments.get(index).map(|s| &s.piece) {
            None => State::Done,
            Some(Piece::Literal(text)) => State::Literal(text),
            Some(Piece::Placeholder(verb)) => State::Placeholder(*verb),
        }
    }

    // Placeholders are never adjacent, so whatever follows one is a literal.
    fn fragment_after(&self, index: usize) -> &str {
        match self.segments.get(index + 1).map(|s| &s.piece) {
            Some(Piece::Literal(text)) => text,
            _ => "",
        }
    }

    fn mismatch(&self, subject: &str, expected: &str, rest: &str) -> Error {
        let mut found = rest.chars();
        let (expected, found) = expected
            .chars()
            .map(|e| (e, found.next()))
            .find(|&(e, f)| f != Some(e))
            .unwrap_or((self.marker, None));
        Error::InvalidString {
            template: self.source.clone(),
            subject: subject.to_string(),
            expected,
            found,
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Cut the capture of a placeholder out of `subject`.
///
/// `fragment` is the literal text that follows the placeholder in the
/// template. The capture runs up to the first occurrence of `fragment`; an
/// empty fragment captures everything. When the first occurrence is at the
/// very start and the fragment occurs again later, the later occurrence wins
/// so the capture is not empty.
pub fn locate_literal<'s>(fragment: &str, subject: &'s str) -> std::result::Result<&'s str, DecodeError> {
    if fragment.is_empty() {
        return Ok(subject);
    }
    let index = match subject.find(fragment) {
        None => {
            return Err(DecodeError::NoMatch {
                fragment: fragment.to_string(),
                subject: subject.to_string(),
            })
        }
        Some(0) => {
            let skip = subject.chars().next().map_or(0, char::len_utf8);
            subject[skip..].find(fragment).map_or(0, |i| i + skip)
        }
        Some(i) => i,
    };
    Ok(&subject[..index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_literal() {
        assert_eq!(locate_literal("Dayo", "SonokoDayo"), Ok("Sonoko"));
        assert_eq!(locate_literal("", "Sonoko"), Ok("Sonoko"));
        assert_eq!(locate_literal("_", "han_maru_gin"), Ok("han"));
        assert_eq!(locate_literal("sonoko", "ssssonoko"), Ok("sss"));
    }

    #[test]
    fn test_locate_literal_skips_leading_match() {
        assert_eq!(locate_literal("OkOkOk", "OkOkOkOk"), Ok("Ok"));
        assert_eq!(locate_literal("Ok", "OkOk"), Ok("Ok"));
        // No later occurrence: the empty capture stands.
        assert_eq!(locate_literal("Ok", "Ok"), Ok(""));
        // Repeated runs stop at the second occurrence.
        assert_eq!(locate_literal("a", "aaaa"), Ok("a"));
    }

    #[test]
    fn test_locate_literal_multibyte_skip() {
        assert_eq!(locate_literal("のこ", "のこのこ"), Ok("のこ"));
        assert_eq!(locate_literal("っ", "かんとずっき"), Ok("かんとず"));
    }

    #[test]
    fn test_locate_literal_no_match() {
        assert_eq!(
            locate_literal("_", "He"),
            Err(DecodeError::NoMatch {
                fragment: "_".to_string(),
                subject: "He".to_string(),
            })
        );
    }

    #[test]
    fn test_compile_segments() {
        let t = Template::compile("Hello %s, my number is %d").unwrap();
        assert_eq!(t.placeholder_count(), 2);
        assert_eq!(t.verbs().collect::<Vec<_>>(), vec![Verb::String, Verb::Decimal]);
        assert_eq!(
            t.segments,
            vec![
                Segment { start: 0, piece: Piece::Literal("Hello ".to_string()) },
                Segment { start: 6, piece: Piece::Placeholder(Verb::String) },
                Segment { start: 8, piece: Piece::Literal(", my number is ".to_string()) },
                Segment { start: 23, piece: Piece::Placeholder(Verb::Decimal) },
            ]
        );
    }

    #[test]
    fn test_compile_rejects_adjacent_markers() {
        assert_eq!(
            Template::compile("ab%s%d"),
            Err(Error::AmbiguousFormat {
                template: "ab%s%d".to_string(),
                position: 4,
            })
        );
    }

    #[test]
    fn test_compile_rejects_unknown_verbs() {
        assert!(matches!(
            Template::compile("50%x"),
            Err(Error::UnknownVerb { position: 2, verb: Some('x'), .. })
        ));
        assert!(matches!(
            Template::compile("100%"),
            Err(Error::UnknownVerb { position: 3, verb: None, .. })
        ));
        assert!(matches!(
            Template::compile("100%%"),
            Err(Error::UnknownVerb { verb: Some('%'), .. })
        ));
    }

    #[test]
    fn test_failure_context_points_at_placeholder() {
        let t = Template::compile("Hello!! my number is %d").unwrap();
        let err = t.scan("Hello!! my number is One").into_result().unwrap_err();
        match err {
            Error::Placeholder { marker, template, subject, source } => {
                assert_eq!(marker, "%d");
                assert_eq!(template, "%d");
                assert_eq!(subject, "One");
                assert!(matches!(source, DecodeError::NotANumber { radix: 10, .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mismatch_reports_end_of_subject() {
        let t = Template::compile("Hello").unwrap();
        assert_eq!(
            t.scan("Hel").into_result(),
            Err(Error::InvalidString {
                template: "Hello".to_string(),
                subject: "Hel".to_string(),
                expected: 'l',
                found: None,
            })
        );
    }
}
