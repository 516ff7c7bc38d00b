use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesRef, BytesStart, Event};
use tracing::debug;

use crate::error::{ParseError, PointDefect, Result, TrackError};
use crate::options::{ParseMode, ParseOptions};
use crate::track::{Track, TrackPoint};

type Coordinates = std::result::Result<(f64, f64), PointDefect>;

/// Parse a GPX document into a [`Track`], skipping defective track points.
pub fn parse(document: &str) -> Result<Track> {
    parse_with_options(document, &ParseOptions::default())
}

/// Parse a GPX document into a [`Track`].
///
/// Every `<trkpt>` in the document contributes one point, in document order,
/// regardless of where it is nested. Only a document that is not well-formed
/// XML is an error in lenient mode; in strict mode the first point with
/// missing or invalid coordinates is one too.
pub fn parse_with_options(document: &str, opts: &ParseOptions) -> Result<Track> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().check_end_names = true;

    let mut builder = TrackBuilder::new(opts.mode);
    let mut open_elements: Vec<String> = Vec::new();
    let mut root_seen = false;
    let mut point: Option<OpenPoint> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if open_elements.is_empty() {
                    enter_root(&mut root_seen)?;
                }
                open_elements.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                let depth = open_elements.len();
                check_attributes(&e)?;

                match point.as_mut() {
                    Some(p) => p.enter(&e, depth),
                    None if is_track_point(&e) => {
                        let index = builder.next_index();
                        point = Some(OpenPoint::new(index, depth, read_coordinates(&e)?));
                    }
                    None => {}
                }
            }
            Event::Empty(e) => {
                if open_elements.is_empty() {
                    enter_root(&mut root_seen)?;
                }
                check_attributes(&e)?;

                match point.as_mut() {
                    Some(p) => p.enter_empty(&e),
                    None if is_track_point(&e) => {
                        let index = builder.next_index();
                        builder.finish(index, read_coordinates(&e)?, 0.0)?;
                    }
                    None => {}
                }
            }
            Event::End(e) => {
                let depth = open_elements.len();
                if open_elements.pop().is_none() {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(ParseError::UnexpectedEndTag(name).into());
                }

                if point.as_ref().is_some_and(|p| p.depth == depth) {
                    if let Some(p) = point.take() {
                        let elevation = p.elevation();
                        builder.finish(p.index, p.coords, elevation)?;
                    }
                } else if let Some(p) = point.as_mut() {
                    p.leave(depth);
                }
            }
            Event::Text(e) => {
                let text = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                if open_elements.is_empty() {
                    if !text.trim().is_empty() {
                        return Err(ParseError::ContentOutsideRoot.into());
                    }
                } else if let Some(p) = point.as_mut() {
                    p.push_text(text);
                }
            }
            Event::CData(e) => {
                if open_elements.is_empty() {
                    return Err(ParseError::ContentOutsideRoot.into());
                }
                if let Some(p) = point.as_mut() {
                    p.push_text(std::str::from_utf8(e.as_ref()).unwrap_or_default());
                }
            }
            Event::GeneralRef(e) => {
                if open_elements.is_empty() {
                    return Err(ParseError::ContentOutsideRoot.into());
                }
                let resolved = resolve_reference(&e)?;
                if let Some(p) = point.as_mut() {
                    p.push_text(&resolved);
                }
            }
            Event::Eof => {
                if let Some(name) = open_elements.pop() {
                    return Err(ParseError::UnclosedElement(name).into());
                }
                if !root_seen {
                    return Err(ParseError::NoRootElement.into());
                }
                break;
            }
            _ => {}
        }
    }

    Ok(builder.build())
}

fn enter_root(root_seen: &mut bool) -> std::result::Result<(), ParseError> {
    if *root_seen {
        return Err(ParseError::ContentOutsideRoot);
    }
    *root_seen = true;
    Ok(())
}

fn is_track_point(e: &BytesStart<'_>) -> bool {
    e.local_name().as_ref() == b"trkpt"
}

/// Read the lat/lon attributes of a `<trkpt>` start tag.
///
/// Malformed attribute syntax fails the document; missing or non-numeric
/// values only make this one point defective.
fn read_coordinates(e: &BytesStart<'_>) -> std::result::Result<Coordinates, ParseError> {
    let mut lat: Option<String> = None;
    let mut lon: Option<String> = None;

    for attr_result in e.attributes() {
        let attr = attr_result?;
        let value = attribute_value(&attr)?;
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(value),
            b"lon" => lon = Some(value),
            _ => {}
        }
    }

    Ok(parse_coordinate("lat", lat)
        .and_then(|lat| parse_coordinate("lon", lon).map(|lon| (lat, lon))))
}

fn check_attributes(e: &BytesStart<'_>) -> std::result::Result<(), ParseError> {
    for attr_result in e.attributes() {
        attribute_value(&attr_result?)?;
    }
    Ok(())
}

/// The unescaped value of an attribute. A raw `<` or an unknown reference
/// makes the document ill-formed.
fn attribute_value(attr: &Attribute<'_>) -> std::result::Result<String, ParseError> {
    let name = || String::from_utf8_lossy(attr.key.as_ref()).into_owned();
    if attr.value.contains(&b'<') {
        return Err(ParseError::LessThanInAttribute(name()));
    }
    let raw = String::from_utf8_lossy(&attr.value);
    match unescape(&raw) {
        Ok(value) => Ok(value.into_owned()),
        Err(source) => Err(ParseError::AttributeReference {
            attribute: name(),
            source,
        }),
    }
}

fn parse_coordinate(attribute: &'static str, raw: Option<String>) -> std::result::Result<f64, PointDefect> {
    let raw = raw.ok_or(PointDefect::MissingAttribute(attribute))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| PointDefect::InvalidAttribute { attribute, value: raw })
}

/// Character references (&#60; &#x3C;) and the predefined XML entities.
/// There is no DTD support, so any other entity is undefined.
fn resolve_reference(e: &BytesRef<'_>) -> std::result::Result<String, ParseError> {
    if let Ok(Some(ch)) = e.resolve_char_ref() {
        return Ok(ch.to_string());
    }
    let name = String::from_utf8_lossy(e.as_ref());
    let s = match name.as_ref() {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => return Err(ParseError::UndefinedEntity(name.into_owned())),
    };
    Ok(s.to_string())
}

/// A `<trkpt>` whose end tag has not been reached yet.
struct OpenPoint {
    index: usize,
    depth: usize,
    coords: Coordinates,
    elevation: ElevationText,
}

enum ElevationText {
    Pending,
    Reading { depth: usize, text: String },
    Read(String),
}

impl OpenPoint {
    fn new(index: usize, depth: usize, coords: Coordinates) -> Self {
        Self {
            index,
            depth,
            coords,
            elevation: ElevationText::Pending,
        }
    }

    /// Only the first `<ele>` below the point counts.
    fn enter(&mut self, e: &BytesStart<'_>, depth: usize) {
        if matches!(self.elevation, ElevationText::Pending) && e.local_name().as_ref() == b"ele" {
            self.elevation = ElevationText::Reading {
                depth,
                text: String::new(),
            };
        }
    }

    fn enter_empty(&mut self, e: &BytesStart<'_>) {
        if matches!(self.elevation, ElevationText::Pending) && e.local_name().as_ref() == b"ele" {
            self.elevation = ElevationText::Read(String::new());
        }
    }

    fn leave(&mut self, depth: usize) {
        if let ElevationText::Reading { depth: open, text } = &mut self.elevation {
            if *open == depth {
                let text = std::mem::take(text);
                self.elevation = ElevationText::Read(text);
            }
        }
    }

    fn push_text(&mut self, s: &str) {
        if let ElevationText::Reading { text, .. } = &mut self.elevation {
            text.push_str(s);
        }
    }

    fn elevation(&self) -> f64 {
        match &self.elevation {
            ElevationText::Read(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|ele| ele.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

struct TrackBuilder {
    mode: ParseMode,
    track: Track,
    seen: usize,
    skipped: usize,
}

impl TrackBuilder {
    fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            track: Track::default(),
            seen: 0,
            skipped: 0,
        }
    }

    fn next_index(&mut self) -> usize {
        self.seen += 1;
        self.seen - 1
    }

    fn finish(&mut self, index: usize, coords: Coordinates, elevation: f64) -> Result<()> {
        match coords.and_then(|(lat, lon)| TrackPoint::new(lat, lon, elevation)) {
            Ok(point) => self.track.push(point),
            Err(reason) => match self.mode {
                ParseMode::Strict => return Err(TrackError::InvalidPoint { index, reason }),
                ParseMode::Lenient => {
                    debug!(index, %reason, "skipping track point");
                    self.skipped += 1;
                }
            },
        }
        Ok(())
    }

    fn build(self) -> Track {
        debug!(
            points = self.track.len(),
            skipped = self.skipped,
            "parsed track log"
        );
        self.track
    }
}
