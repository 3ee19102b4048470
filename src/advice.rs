use serde::Serialize;

use crate::symbols::{Element, Stem};
use crate::ten_gods::{classify, TenGod};

// ---------------------------
// ## Advice Entries
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Disposition {
    Favorable,
    Unfavorable,
}

/// A favored or unfavored element seen through one of its stems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub disposition: Disposition,
    pub element: Element,
    pub stem: Stem,
    pub ten_god: TenGod,
}

// ---------------------------
// ## Translation
// ---------------------------

/// Translate element preferences into ten-god advice, favorable entries first.
///
/// Each element yields one entry per stem (yang, then yin), classified against
/// the day master.
pub fn translate<'a>(
    day_master: Stem,
    favored: impl IntoIterator<Item = &'a Element>,
    unfavored: impl IntoIterator<Item = &'a Element>,
) -> Vec<Advice> {
    let mut advice = Vec::new();
    push_entries(&mut advice, day_master, favored, Disposition::Favorable);
    push_entries(&mut advice, day_master, unfavored, Disposition::Unfavorable);
    advice
}

fn push_entries<'a>(
    out: &mut Vec<Advice>,
    day_master: Stem,
    elements: impl IntoIterator<Item = &'a Element>,
    disposition: Disposition,
) {
    for &element in elements {
        for stem in Stem::of_element(element) {
            out.push(Advice {
                disposition,
                element,
                stem,
                ten_god: classify(day_master, stem),
            });
        }
    }
}
