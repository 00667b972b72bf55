//! Single-line text renderings of structured document values.
//!
//! Keyed-list comparisons work on strings, so composite values (codings,
//! identifiers, contacts, usage-context values) are flattened to a stable
//! textual form before they are compared. The same strings are what a
//! presentation layer shows in its left/right columns.
use crate::document::{
    CodeableConcept, Coding, ContactDetail, ContactPoint, Identifier, Quantity, Range, Reference,
    UsageContext,
};

/// Placeholder rendered for an absent value.
pub const NULL: &str = "null";

/// `(system) (@version) code: display`, omitting absent parts.
pub fn coding(coding: &Coding) -> String {
    let mut out = String::new();
    if let Some(system) = &coding.system {
        out.push_str(&format!("({system}) "));
    }
    if let Some(version) = &coding.version {
        out.push_str(&format!("(@{version}) "));
    }
    if let Some(code) = &coding.code {
        out.push_str(code);
    }
    if let Some(display) = &coding.display {
        out.push_str(&format!(": {display}"));
    }
    out.trim().trim_start_matches(':').trim().to_owned()
}

/// Comma-separated [`coding`] renderings.
pub fn coding_list(codings: &[Coding]) -> String {
    codings.iter().map(coding).collect::<Vec<_>>().join(", ")
}

/// `[use] (system) value`, with `null` standing in for an absent value.
pub fn identifier(identifier: &Identifier) -> String {
    let mut out = String::new();
    if let Some(use_code) = &identifier.use_code {
        out.push_str(&format!("[{use_code}] "));
    }
    if let Some(system) = &identifier.system {
        out.push_str(&format!("({system}) "));
    }
    out.push_str(identifier.value.as_deref().unwrap_or(NULL));
    out
}

/// `name: telecom; telecom`.
pub fn contact(contact: &ContactDetail) -> String {
    let mut out = contact.name.clone().unwrap_or_default();
    if !contact.telecom.is_empty() {
        let telecom = contact
            .telecom
            .iter()
            .map(contact_point)
            .collect::<Vec<_>>()
            .join("; ");
        out.push_str(&format!(": {telecom}"));
    }
    out.trim().to_owned()
}

fn contact_point(point: &ContactPoint) -> String {
    let mut out = String::new();
    if let Some(use_code) = &point.use_code {
        out.push_str(&format!("[{use_code}] "));
    }
    if let Some(system) = &point.system {
        out.push_str(&format!("({system}) "));
    }
    if let Some(value) = &point.value {
        out.push_str(value);
    }
    if let Some(rank) = point.rank {
        out.push_str(&format!(" @{rank}"));
    }
    out.trim().to_owned()
}

fn quantity(q: &Quantity) -> String {
    let mut out = String::new();
    if let Some(comparator) = &q.comparator {
        out.push_str(&format!("{comparator} "));
    }
    if let Some(value) = &q.value {
        out.push_str(&value.to_string());
    }
    if let Some(unit) = &q.unit {
        out.push_str(&format!(" {unit}"));
    }
    if let Some(code) = &q.code {
        let system = q.system.as_deref().unwrap_or(NULL);
        out.push_str(&format!(" ({system} = {code})"));
    }
    out.trim().to_owned()
}

fn range(r: &Range) -> String {
    let low = r.low.as_ref().map(quantity).unwrap_or_default();
    let high = r.high.as_ref().map(quantity).unwrap_or_default();
    format!("{low} - {high}").trim().to_owned()
}

fn reference(r: &Reference) -> String {
    let mut out = String::new();
    if let Some(resource_type) = &r.resource_type {
        out.push_str(&format!("{resource_type} "));
    }
    if let Some(target) = &r.reference {
        out.push_str(target);
    }
    if let Some(id) = &r.identifier {
        out.push_str(&format!(" ({})", identifier(id)));
    }
    out.trim().to_owned()
}

/// Text of a codeable concept followed by its codings.
pub fn codeable_concept(cc: &CodeableConcept) -> String {
    let text = cc.text.as_deref().unwrap_or(NULL);
    format!("{text} - {}", coding_list(&cc.coding))
}

/// Renders whichever value a usage context carries, or `None`.
pub fn usage_context_value(ctx: &UsageContext) -> Option<String> {
    if let Some(cc) = &ctx.value_codeable_concept {
        return Some(codeable_concept(cc));
    }
    if let Some(q) = &ctx.value_quantity {
        return Some(quantity(q));
    }
    if let Some(r) = &ctx.value_range {
        return Some(range(r));
    }
    ctx.value_reference.as_ref().map(reference)
}
