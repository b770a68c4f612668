//! Processing-function recommendations for a single attribute.
//!
//! Candidates are filtered by value class, then ranked by the first rule
//! that fires. Rules are plain data in evaluation order so each one can be
//! exercised on its own:
//!
//! | Weight | Rule | Hint |
//! |--------|------|------|
//! | 10 | function is the attribute's assigned `proc` | |
//! | 9 | the none-function | |
//! | 8 | tag is a case-insensitive substring of the attribute name | ` (suggested)` |
//! | 7 | tag is a case-insensitive substring of the rename | ` (suggested)` |
//! | 6 | tag is literally `generic` | ` (generic)` |
//! | 0 | nothing matched | ` (other)` |
//!
//! Tags are scanned in declared order and the first tag that satisfies any
//! tag rule decides; later tags are not consulted. Ties keep catalog order.

use crate::attribute::Attribute;
use crate::catalog::{FunctionCatalog, ProcessingFunction, ValueType};

/// Label suffix explaining why a function was ranked where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hint {
    None,
    Suggested,
    Generic,
    Other,
}

impl Hint {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Suggested => " (suggested)",
            Self::Generic => " (generic)",
            Self::Other => " (other)",
        }
    }
}

/// Weight and hint assigned to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranking {
    pub weight: u8,
    pub hint: Hint,
}

impl Ranking {
    const fn new(weight: u8, hint: Hint) -> Self {
        Self { weight, hint }
    }
}

/// Tag literal that marks a function as broadly applicable.
pub const GENERIC_TAG: &str = "generic";

const ASSIGNED: Ranking = Ranking::new(10, Hint::None);
const NONE_FUNCTION: Ranking = Ranking::new(9, Hint::None);
const NAME_MATCH: Ranking = Ranking::new(8, Hint::Suggested);
const RENAME_MATCH: Ranking = Ranking::new(7, Hint::Suggested);
const GENERIC: Ranking = Ranking::new(6, Hint::Generic);
const UNMATCHED: Ranking = Ranking::new(0, Hint::Other);

/// Attribute data the rules look at, lowercased once.
struct RankContext<'a> {
    name: String,
    rename: Option<String>,
    proc: Option<&'a str>,
}

impl<'a> RankContext<'a> {
    fn new(attribute: &'a Attribute) -> Self {
        Self {
            name: attribute.name.to_lowercase(),
            rename: attribute.rename.as_deref().map(str::to_lowercase),
            proc: attribute.proc.as_deref(),
        }
    }
}

type FunctionRule = fn(&RankContext<'_>, &ProcessingFunction) -> Option<Ranking>;
type TagRule = fn(&RankContext<'_>, &str) -> Option<Ranking>;

const FUNCTION_RULES: [FunctionRule; 3] = [assigned_function, none_function, first_matching_tag];
const TAG_RULES: [TagRule; 3] = [tag_in_name, tag_in_rename, generic_tag];

fn assigned_function(ctx: &RankContext<'_>, function: &ProcessingFunction) -> Option<Ranking> {
    (ctx.proc == Some(function.name.as_str())).then_some(ASSIGNED)
}

fn none_function(_: &RankContext<'_>, function: &ProcessingFunction) -> Option<Ranking> {
    function.is_none().then_some(NONE_FUNCTION)
}

fn first_matching_tag(ctx: &RankContext<'_>, function: &ProcessingFunction) -> Option<Ranking> {
    function
        .tags
        .iter()
        .find_map(|tag| TAG_RULES.iter().find_map(|rule| rule(ctx, tag)))
}

fn tag_in_name(ctx: &RankContext<'_>, tag: &str) -> Option<Ranking> {
    ctx.name.contains(&tag.to_lowercase()).then_some(NAME_MATCH)
}

fn tag_in_rename(ctx: &RankContext<'_>, tag: &str) -> Option<Ranking> {
    let tag = tag.to_lowercase();
    ctx.rename
        .as_deref()
        .filter(|rename| rename.contains(&tag))
        .map(|_| RENAME_MATCH)
}

fn generic_tag(_: &RankContext<'_>, tag: &str) -> Option<Ranking> {
    (tag == GENERIC_TAG).then_some(GENERIC)
}

/// Whether a function may be offered for the attribute at all.
///
/// The none-function always passes. Attributes without a usable type admit
/// nothing else.
pub fn admits(attribute: &Attribute, function: &ProcessingFunction) -> bool {
    if function.is_none() {
        return true;
    }
    attribute
        .attr_type
        .and_then(ValueType::for_attribute)
        .is_some_and(|accepted| accepted == function.value_type)
}

/// Rank a single function against an attribute.
pub fn rank(attribute: &Attribute, function: &ProcessingFunction) -> Ranking {
    let ctx = RankContext::new(attribute);
    rank_with(&ctx, function)
}

fn rank_with(ctx: &RankContext<'_>, function: &ProcessingFunction) -> Ranking {
    FUNCTION_RULES
        .iter()
        .find_map(|rule| rule(ctx, function))
        .unwrap_or(UNMATCHED)
}

/// A ranked candidate ready for a selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation<'a> {
    pub function: &'a ProcessingFunction,
    pub ranking: Ranking,
}

impl Recommendation<'_> {
    pub fn hint(&self) -> Hint {
        self.ranking.hint
    }

    /// Display name followed by the hint suffix.
    pub fn label(&self) -> String {
        format!("{}{}", self.function.display_name, self.ranking.hint.suffix())
    }
}

/// Filter and rank the catalog for one attribute, best candidate first.
pub fn recommend<'a>(attribute: &Attribute, catalog: &'a FunctionCatalog) -> Vec<Recommendation<'a>> {
    let ctx = RankContext::new(attribute);
    let mut candidates: Vec<Recommendation<'a>> = catalog
        .functions()
        .iter()
        .filter(|function| admits(attribute, function))
        .map(|function| Recommendation {
            function,
            ranking: rank_with(&ctx, function),
        })
        .collect();
    // stable: equal weights keep catalog order
    candidates.sort_by(|a, b| b.ranking.weight.cmp(&a.ranking.weight));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeType;
    use crate::value::AttributeValue;

    fn number_fn(name: &str, tags: &[&str]) -> ProcessingFunction {
        ProcessingFunction::new(name, name.to_uppercase(), ValueType::Number)
            .with_tags(tags.iter().copied())
    }

    fn temperature() -> Attribute {
        Attribute::observed("temperature", AttributeValue::Number(21.5))
    }

    fn summary(recs: &[Recommendation<'_>]) -> Vec<(String, &'static str)> {
        recs.iter()
            .map(|r| (r.function.name.clone(), r.hint().suffix()))
            .collect()
    }

    #[test]
    fn test_documented_ranking_example() {
        let catalog = FunctionCatalog::new(vec![
            number_fn("round2", &[]),
            number_fn("celsius", &["temp"]),
            number_fn("generic_num", &["generic"]),
        ]);
        let attr = temperature().with_proc("round2");
        let recs = recommend(&attr, &catalog);
        assert_eq!(
            summary(&recs),
            vec![
                ("round2".to_string(), ""),
                ("".to_string(), ""),
                ("celsius".to_string(), " (suggested)"),
                ("generic_num".to_string(), " (generic)"),
            ]
        );
    }

    #[test]
    fn test_individual_rules() {
        let attr = temperature().with_rename("Room Heat").with_proc("chosen");
        assert_eq!(rank(&attr, &number_fn("chosen", &["generic"])), ASSIGNED);
        assert_eq!(rank(&attr, &ProcessingFunction::none()), NONE_FUNCTION);
        assert_eq!(rank(&attr, &number_fn("a", &["TEMP"])), NAME_MATCH);
        assert_eq!(rank(&attr, &number_fn("b", &["heat"])), RENAME_MATCH);
        assert_eq!(rank(&attr, &number_fn("c", &["generic"])), GENERIC);
        assert_eq!(rank(&attr, &number_fn("d", &["pressure"])), UNMATCHED);
    }

    #[test]
    fn test_first_matching_tag_wins() {
        let attr = temperature().with_rename("Room Heat");
        // rename match declared before name match: rename weight applies
        assert_eq!(rank(&attr, &number_fn("a", &["heat", "temp"])), RENAME_MATCH);
        assert_eq!(rank(&attr, &number_fn("b", &["temp", "heat"])), NAME_MATCH);
        // generic declared first shadows a later name match
        assert_eq!(rank(&attr, &number_fn("c", &["generic", "temp"])), GENERIC);
        // non-matching tags are skipped
        assert_eq!(rank(&attr, &number_fn("d", &["volt", "temp"])), NAME_MATCH);
    }

    #[test]
    fn test_generic_tag_is_case_sensitive_literal() {
        let attr = temperature();
        assert_eq!(rank(&attr, &number_fn("a", &["generic"])), GENERIC);
        assert_eq!(rank(&attr, &number_fn("b", &["Generic"])), UNMATCHED);
        // substring rules still see it case-insensitively
        let attr = Attribute::observed("generic_counter", AttributeValue::Number(3.0));
        assert_eq!(rank(&attr, &number_fn("c", &["GENERIC"])), NAME_MATCH);
    }

    #[test]
    fn test_assigned_and_none_never_hinted() {
        let catalog = FunctionCatalog::new(vec![number_fn("celsius", &["temp"])]);
        let attr = temperature().with_proc("celsius");
        let recs = recommend(&attr, &catalog);
        assert_eq!(recs[0].label(), "CELSIUS");
        assert_eq!(recs[1].label(), "None");
    }

    #[test]
    fn test_fetched_none_function_ignores_tags() {
        let passthrough = ProcessingFunction::new("passthrough", "Pass through", ValueType::NoneType)
            .with_tags(["temp", "generic"]);
        let attr = temperature().with_rename("temp sensor");
        assert_eq!(rank(&attr, &passthrough), NONE_FUNCTION);

        let catalog = FunctionCatalog::new(vec![number_fn("celsius", &["temp"]), passthrough]);
        let recs = recommend(&attr, &catalog);
        let entry = recs
            .iter()
            .find(|r| r.function.name == "passthrough")
            .unwrap();
        assert_eq!(entry.hint().suffix(), "");
        assert_eq!(entry.label(), "Pass through");
        assert_eq!(recs[0].function.name, "passthrough");
    }

    #[test]
    fn test_bool_attribute_filters_value_types() {
        let catalog = FunctionCatalog::new(vec![
            number_fn("round2", &[]),
            ProcessingFunction::new("invert", "Invert", ValueType::Bool),
            ProcessingFunction::new("upper", "Upper", ValueType::String),
        ]);
        let attr = Attribute::observed("active", AttributeValue::Bool(true));
        let recs = recommend(&attr, &catalog);
        assert!(recs
            .iter()
            .all(|r| matches!(r.function.value_type, ValueType::Bool | ValueType::NoneType)));
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn test_untyped_attribute_admits_only_none() {
        let catalog = FunctionCatalog::new(vec![
            number_fn("round2", &["generic"]),
            ProcessingFunction::new("upper", "Upper", ValueType::String).with_tags(["generic"]),
        ]);
        for attr in [
            Attribute::observed("battery", AttributeValue::Null),
            Attribute::observed("x", AttributeValue::Number(f64::NAN)),
            Attribute::new("never_seen"),
        ] {
            let recs = recommend(&attr, &catalog);
            assert_eq!(recs.len(), 1);
            assert!(recs[0].function.is_none());
        }
        assert_eq!(
            Attribute::observed("x", AttributeValue::Number(f64::NAN)).attr_type,
            Some(AttributeType::Unresolved)
        );
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = FunctionCatalog::new(vec![
            number_fn("z_other", &[]),
            number_fn("b_temp", &["temp"]),
            number_fn("a_other", &[]),
            number_fn("a_temp", &["TEMPERATURE"]),
        ]);
        let recs = recommend(&temperature(), &catalog);
        let names: Vec<_> = recs.iter().map(|r| r.function.name.as_str()).collect();
        assert_eq!(names, vec!["", "b_temp", "a_temp", "z_other", "a_other"]);
        assert_eq!(recs[3].label(), "Z_OTHER (other)");
    }
}
