//! Confirmation page parser.
//!
//! The page returned by the acceptance URL carries a status headline and a
//! details block. The details block is flattened to text and matched with
//! [`DETAILS_PATTERN`]:
//!
//! ```text
//! Date: 15, October 2024Start time: Tuesday at 18:30End time: ...Program: Vinyasa Flow Location: ...
//! ```
//!
//! where the blanks after each label are non-breaking spaces.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::PageLayout;
use crate::error::{AcceptError, ConfigError};
use crate::reservation::types::{ClassDetails, ReservationResult};

/// Captures: day, month, year, weekday, start time, program.
///
/// Month and weekday must be spelled out in full.
/// If the provider stops emitting `\xa0` after the labels, widen to `\s+`.
pub const DETAILS_PATTERN: &str = concat!(
    r"Date:\xa0+(\d{2}), ",
    r"(January|February|March|April|May|June|July|August|September|October|November|December)",
    r" (\d{4})Start time:\xa0+",
    r"(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)",
    r" at (.*)End.*Program:\xa0+(.*)Location",
);

/// `chrono` format for the assembled `"<weekday>, <month> <day>, <year>, <time>"`.
pub const DETAILS_TIME_FORMAT: &str = "%A, %B %d, %Y, %H:%M";

static DETAILS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DETAILS_PATTERN).expect("details pattern compiles"));

struct CompiledLayout {
    status: Selector,
    details: Selector,
}

/// Extracts a [`ReservationResult`] from confirmation page HTML.
pub struct ConfirmationParser {
    layouts: Vec<CompiledLayout>,
}

impl ConfirmationParser {
    /// Compile the layouts' selectors. Layouts are tried in the given order.
    pub fn new(layouts: &[PageLayout]) -> Result<Self, ConfigError> {
        let layouts = layouts
            .iter()
            .map(|layout| {
                Ok(CompiledLayout {
                    status: compile(&layout.status_selector)?,
                    details: compile(&layout.details_selector)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { layouts })
    }

    /// Parse a confirmation page.
    ///
    /// The first layout whose status element exists wins; its details element
    /// must then exist too.
    pub fn parse(&self, html: &str) -> Result<ReservationResult, AcceptError> {
        let doc = Html::parse_document(html);

        let (status_node, layout) = self
            .layouts
            .iter()
            .find_map(|layout| doc.select(&layout.status).next().map(|node| (node, layout)))
            .ok_or(AcceptError::StatusMissing)?;

        let details_node = doc
            .select(&layout.details)
            .next()
            .ok_or(AcceptError::DetailsMissing)?;

        let status = inner_text(status_node).trim().to_string();
        let class = parse_details(&inner_text(details_node))?;

        Ok(ReservationResult { status, class })
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Concatenated text of every descendant text node.
fn inner_text(node: ElementRef<'_>) -> String {
    node.text().collect()
}

/// Match the flattened details text and build the class start instant.
pub fn parse_details(text: &str) -> Result<ClassDetails, AcceptError> {
    let caps = DETAILS_RE.captures(text).ok_or(AcceptError::DetailsUnparsed)?;
    let (day, month, year, weekday, time, program) =
        (&caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6]);

    let input = format!("{weekday}, {month} {day}, {year}, {time}");
    debug!(when = %input, program, "Matched class details");

    let starts_at = NaiveDateTime::parse_from_str(&input, DETAILS_TIME_FORMAT)
        .map_err(|source| AcceptError::TimeUnparsed {
            input: input.clone(),
            source,
        })?
        .and_utc();

    Ok(ClassDetails {
        program: program.to_string(),
        starts_at,
    })
}
