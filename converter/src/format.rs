//! Rendering of snak values into RDF terms.
//!
//! Every lexical form here has to match the Wikibase RDF exporter byte for
//! byte: signed decimals, Java-style doubles, cleaned `xsd:dateTime`
//! values, MediaWiki title encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};
use tracing::warn;

use crate::calendar::{julian_to_gregorian, Date};
use crate::error::{ConvertError, Result};
use crate::model::{
    GlobeCoordinate, PropertyId, Quantity, Time, Value, PRECISION_DAY, PRECISION_MONTH,
};
use crate::registry::{Datatype, PropertyShape};
use crate::term::{Iri, Literal, Term};
use crate::vocabulary::{items, iris, Namespace, Vocabulary};

/// Bytes MediaWiki leaves unescaped in page-title URLs.
const TITLE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b';')
    .remove(b'@')
    .remove(b'$')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')')
    .remove(b',')
    .remove(b'/')
    .remove(b'~')
    .remove(b':');

/// Bytes that may not appear in an `IRIREF`.
const IRI_ILLEGAL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'<')
    .add(b'>')
    .add(b'"')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'^')
    .add(b'`')
    .add(b'\\');

/// Formats a double the way Java's `Double.toString` does.
///
/// Magnitudes in `[1e-3, 1e7)` use plain decimal notation with at least one
/// fraction digit; everything else uses `d.dddE±n` with the shortest digits
/// that round-trip.
#[must_use]
pub fn format_double(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_owned();
    }
    if (1e-3..1e7).contains(&x.abs()) {
        let plain = format!("{x}");
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sci = format!("{x:e}");
        match sci.split_once('e') {
            Some((mantissa, exponent)) if mantissa.contains('.') => {
                format!("{mantissa}E{exponent}")
            }
            Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
            None => sci,
        }
    }
}

/// Validates a decimal string and gives it an explicit sign (`3` → `+3`).
///
/// # Errors
///
/// Returns [`ConvertError::MalformedValue`] if `amount` is not a decimal.
pub fn signed_decimal(property: &PropertyId, amount: &str) -> Result<String> {
    let (sign, digits) = match amount.as_bytes().first() {
        Some(b'+') => ("+", &amount[1..]),
        Some(b'-') => ("-", &amount[1..]),
        _ => ("+", amount),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, "0"));
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(int) || !is_digits(frac) {
        return Err(ConvertError::malformed(
            property,
            format!("not a decimal: {amount:?}"),
        ));
    }
    Ok(format!("{sign}{digits}"))
}

/// The timestamp as used in canonical forms: always with a leading sign.
#[must_use]
pub fn canonical_timestamp(timestamp: &str) -> String {
    if timestamp.starts_with('+') || timestamp.starts_with('-') {
        timestamp.to_owned()
    } else {
        format!("+{timestamp}")
    }
}

struct Timestamp<'a> {
    negative: bool,
    year: i64,
    month: u8,
    day: u8,
    clock: &'a str,
}

fn parse_timestamp(timestamp: &str) -> Option<Timestamp<'_>> {
    let (negative, rest) = match timestamp.as_bytes().first() {
        Some(b'+') => (false, &timestamp[1..]),
        Some(b'-') => (true, &timestamp[1..]),
        _ => (false, timestamp),
    };
    let (date, clock) = rest.split_once('T')?;
    let clock = clock.strip_suffix('Z')?;
    let clock_ok = clock.len() == 8
        && clock.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b':',
            _ => b.is_ascii_digit(),
        });
    if !clock_ok {
        return None;
    }
    let mut parts = date.rsplitn(3, '-');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(year) || !all_digits(month) || !all_digits(day) {
        return None;
    }
    let month: u8 = month.parse().ok()?;
    let day: u8 = day.parse().ok()?;
    if month > 12 || day > 31 {
        return None;
    }
    Some(Timestamp {
        negative,
        year: year.parse().ok()?,
        month,
        day,
        clock,
    })
}

/// Renders a time value as the lexical form of an `xsd:dateTime`.
///
/// The sign of positive years is dropped, years are padded to four digits,
/// unknown (`00`) or imprecise months and days become `01`, BCE years shift
/// by one to XSD 1.1 numbering, and Julian dates of day precision or finer
/// are converted to the proleptic Gregorian calendar. Julian dates whose
/// Gregorian year would leave the `i64` range keep their stored date.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedValue`] if the timestamp cannot be parsed.
pub fn xsd_timestamp(property: &PropertyId, time: &Time, vocab: &Vocabulary) -> Result<String> {
    let parsed = parse_timestamp(&time.timestamp).ok_or_else(|| {
        ConvertError::malformed(property, format!("bad timestamp: {:?}", time.timestamp))
    })?;
    let mut month = parsed.month;
    let mut day = parsed.day;
    if time.precision < PRECISION_MONTH || month == 0 {
        month = 1;
    }
    if time.precision < PRECISION_DAY || day == 0 {
        day = 1;
    }
    let mut year = if parsed.negative {
        1 - parsed.year
    } else {
        parsed.year
    };
    let julian = vocab.entity_local_name(&time.calendar_model) == Some(items::JULIAN);
    if julian && time.precision >= PRECISION_DAY {
        match julian_to_gregorian(Date::new(year, month, day)) {
            Some(gregorian) => {
                year = gregorian.year;
                month = gregorian.month;
                day = gregorian.day;
            }
            None => warn!(
                property = %property,
                timestamp = %time.timestamp,
                "Julian date out of range, kept as stored"
            ),
        }
    }
    let sign = if year < 0 { "-" } else { "" };
    Ok(format!(
        "{sign}{:04}-{month:02}-{day:02}T{}Z",
        year.unsigned_abs(),
        parsed.clock
    ))
}

fn is_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary_ok = parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphabetic()));
    primary_ok && parts.all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// Normalizes a Wikibase language code to a Turtle language tag.
///
/// Returns `None` for codes that cannot be written as a tag.
#[must_use]
pub fn language_tag(code: &str) -> Option<String> {
    let tag = code.replace('_', "-");
    is_language_tag(&tag).then_some(tag)
}

/// Encodes a page title the way MediaWiki builds article URLs.
#[must_use]
pub fn encode_title(title: &str) -> String {
    utf8_percent_encode(&title.replace(' ', "_"), TITLE).to_string()
}

/// Percent-encodes the characters that may not appear in an IRI.
#[must_use]
pub fn escape_iri(iri: &str) -> String {
    utf8_percent_encode(iri, IRI_ILLEGAL).to_string()
}

/// The IRI of a Commons media file.
#[must_use]
pub fn commons_iri(file_name: &str) -> Iri {
    Iri::full(format!("{}{}", iris::COMMONS_FILE_PATH, encode_title(file_name)))
}

/// Compacts an IRI in the entity namespace to `wd:` form.
#[must_use]
pub fn resource_iri(iri: &str, vocab: &Vocabulary) -> Iri {
    match vocab.entity_local_name(iri) {
        Some(local) => Iri::name(Namespace::Wd, local),
        None => Iri::full(escape_iri(iri)),
    }
}

/// The unit of a quantity; dimensionless quantities get the "1" item.
#[must_use]
pub fn unit_iri(unit: Option<&str>, vocab: &Vocabulary) -> Iri {
    match unit {
        None | Some("1") | Some("") => Iri::name(Namespace::Wd, items::NO_UNIT),
        Some(iri) => resource_iri(iri, vocab),
    }
}

/// The globe of a coordinate; Earth when unset.
#[must_use]
pub fn globe_iri(globe: Option<&str>, vocab: &Vocabulary) -> Iri {
    match globe {
        None | Some("") => Iri::name(Namespace::Wd, items::EARTH),
        Some(iri) => resource_iri(iri, vocab),
    }
}

fn is_earth(globe: &Iri) -> bool {
    matches!(globe, Iri::Name(Namespace::Wd, local) if local == items::EARTH)
}

/// The `geo:wktLiteral` of a coordinate; non-Earth globes prefix the point
/// with the globe IRI. Numbers use [`format_double`], like the value node.
#[must_use]
pub fn wkt_literal(coordinate: &GlobeCoordinate, vocab: &Vocabulary) -> Literal {
    let globe = globe_iri(coordinate.globe.as_deref(), vocab);
    let point = format!(
        "Point({} {})",
        format_double(coordinate.longitude),
        format_double(coordinate.latitude)
    );
    let lexical = if is_earth(&globe) {
        point
    } else {
        format!("<{}> {point}", globe.expand(vocab))
    };
    Literal::typed(lexical, Iri::name(Namespace::Geo, "wktLiteral"))
}

/// What a snak contributes as the object of its property predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum SnakObject {
    /// A concrete value.
    Value(Term),
    /// No value: the owner node gets typed with the `wdno:` class.
    NoValue,
    /// Unknown value: the owner node points at a skolem IRI.
    SomeValue,
    /// A value with no RDF form, such as text with an invalid language code.
    /// The snak is skipped.
    Skipped,
}

fn mismatch(shape: &PropertyShape, found: &str) -> ConvertError {
    ConvertError::malformed(
        &shape.id,
        format!("{found} value for a {} property", shape.datatype),
    )
}

/// Renders the simple (non-node) form of a snak value.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedValue`] if the value does not fit the
/// property datatype or has a malformed lexical form.
pub fn snak_object(shape: &PropertyShape, value: &Value, vocab: &Vocabulary) -> Result<SnakObject> {
    let term = match value {
        Value::NoValue => return Ok(SnakObject::NoValue),
        Value::SomeValue => return Ok(SnakObject::SomeValue),
        Value::EntityRef(id) => {
            if !shape.datatype.is_entity_reference() {
                return Err(mismatch(shape, "entity"));
            }
            Term::Iri(Iri::name(Namespace::Wd, id.as_str()))
        }
        Value::StringLit(text) => match shape.datatype {
            Datatype::String | Datatype::ExternalId => Literal::plain(text.as_str()).into(),
            Datatype::Url => Iri::full(escape_iri(text)).into(),
            Datatype::CommonsMedia => commons_iri(text).into(),
            Datatype::Math => Literal::typed(text.as_str(), Iri::full(iris::MATHML)).into(),
            Datatype::WikibaseItem
            | Datatype::WikibaseProperty
            | Datatype::MonolingualText
            | Datatype::Quantity
            | Datatype::Time
            | Datatype::GlobeCoordinate => return Err(mismatch(shape, "string")),
        },
        Value::MonolingualText { language, text } => {
            if shape.datatype != Datatype::MonolingualText {
                return Err(mismatch(shape, "monolingual text"));
            }
            let Some(tag) = language_tag(language) else {
                warn!(property = %shape.id, language = %language, "skipping text with invalid language code");
                return Ok(SnakObject::Skipped);
            };
            Literal::lang(text.as_str(), tag).into()
        }
        Value::Quantity(quantity) => {
            if shape.datatype != Datatype::Quantity {
                return Err(mismatch(shape, "quantity"));
            }
            Literal::xsd(signed_decimal(&shape.id, &quantity.amount)?, "decimal").into()
        }
        Value::Time(time) => {
            if shape.datatype != Datatype::Time {
                return Err(mismatch(shape, "time"));
            }
            Literal::xsd(xsd_timestamp(&shape.id, time, vocab)?, "dateTime").into()
        }
        Value::GlobeCoordinate(coordinate) => {
            if shape.datatype != Datatype::GlobeCoordinate {
                return Err(mismatch(shape, "globe coordinate"));
            }
            wkt_literal(coordinate, vocab).into()
        }
    };
    Ok(SnakObject::Value(term))
}

/// The normalized form of a value, for datatypes that have one.
///
/// External identifiers normalize to the IRI built from the property's
/// canonical IRI template. Time and quantity values have no normalization
/// rules configured here and produce nothing.
#[must_use]
pub fn normalized_object(shape: &PropertyShape, value: &Value) -> Option<Term> {
    match (shape.datatype, value, shape.canonical_uri.as_deref()) {
        (Datatype::ExternalId, Value::StringLit(id), Some(template)) => {
            let iri = template.replace("$1", &utf8_percent_encode(id, TITLE).to_string());
            Some(Iri::full(escape_iri(&iri)).into())
        }
        _ => None,
    }
}

/// A structured value node: its IRI, class and field triples.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    /// `wdv:` IRI of the node.
    pub iri: Iri,
    /// Local name of the node class in the `wikibase:` namespace.
    pub class: &'static str,
    /// Field predicates (local names in `wikibase:`) and objects.
    pub fields: Vec<(&'static str, Term)>,
}

fn time_node(property: &PropertyId, time: &Time, vocab: &Vocabulary) -> Result<Vec<(&'static str, Term)>> {
    Ok(vec![
        (
            "timeValue",
            Literal::xsd(xsd_timestamp(property, time, vocab)?, "dateTime").into(),
        ),
        ("timePrecision", Literal::integer(i64::from(time.precision)).into()),
        ("timeTimezone", Literal::integer(i64::from(time.timezone)).into()),
        (
            "timeCalendarModel",
            resource_iri(&time.calendar_model, vocab).into(),
        ),
    ])
}

fn quantity_node(
    property: &PropertyId,
    quantity: &Quantity,
    vocab: &Vocabulary,
) -> Result<Vec<(&'static str, Term)>> {
    let decimal = |s: &str| -> Result<Term> {
        Ok(Literal::xsd(signed_decimal(property, s)?, "decimal").into())
    };
    let mut fields = vec![("quantityAmount", decimal(&quantity.amount)?)];
    if let Some(upper) = &quantity.upper_bound {
        fields.push(("quantityUpperBound", decimal(upper)?));
    }
    if let Some(lower) = &quantity.lower_bound {
        fields.push(("quantityLowerBound", decimal(lower)?));
    }
    fields.push(("quantityUnit", unit_iri(quantity.unit.as_deref(), vocab).into()));
    Ok(fields)
}

fn globe_node(coordinate: &GlobeCoordinate, vocab: &Vocabulary) -> Vec<(&'static str, Term)> {
    let double = |x: f64| -> Term { Literal::xsd(format_double(x), "double").into() };
    let mut fields = vec![
        ("geoLatitude", double(coordinate.latitude)),
        ("geoLongitude", double(coordinate.longitude)),
    ];
    if let Some(precision) = coordinate.precision {
        fields.push(("geoPrecision", double(precision)));
    }
    fields.push(("geoGlobe", globe_iri(coordinate.globe.as_deref(), vocab).into()));
    fields
}

/// Builds the value node of a structured value; `None` for simple values.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedValue`] for malformed decimals or
/// timestamps.
pub fn value_node(property: &PropertyId, value: &Value, vocab: &Vocabulary) -> Result<Option<ValueNode>> {
    let Some(iri) = vocab.value_node_uri(property, value)? else {
        return Ok(None);
    };
    let (class, fields) = match value {
        Value::Time(time) => ("TimeValue", time_node(property, time, vocab)?),
        Value::Quantity(quantity) => ("QuantityValue", quantity_node(property, quantity, vocab)?),
        Value::GlobeCoordinate(coordinate) => ("GlobecoordinateValue", globe_node(coordinate, vocab)),
        Value::EntityRef(_)
        | Value::StringLit(_)
        | Value::MonolingualText { .. }
        | Value::NoValue
        | Value::SomeValue => return Ok(None),
    };
    Ok(Some(ValueNode { iri, class, fields }))
}
