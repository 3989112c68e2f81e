use operator_audit::specifier::{
    classify, parse, parse_with_ceiling, ClauseKind, PlatformVersion, ShapeSet, SpecifierShape,
    SupportedVersion, POLICY_CEILING,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn v(major: u32, minor: u32) -> SupportedVersion {
    SupportedVersion::Release(PlatformVersion::new(major, minor))
}

fn strings(specifier: &str) -> Vec<String> {
    parse(specifier).iter().map(|v| v.to_string()).collect()
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn empty_and_absent_specifiers_yield_nothing() {
    assert!(parse("").is_empty());
    assert!(parse(None).is_empty());
    assert!(parse("   ").is_empty());
    assert!(parse("\"\"").is_empty());
    assert!(parse(",,").is_empty());
}

#[test]
fn explicit_clause_is_a_single_version() {
    assert_eq!(strings("=v4.12"), ["v4.12"]);
}

#[test]
fn ranged_clause_is_inclusive_and_ordered() {
    assert_eq!(strings("v4.11-v4.13"), ["v4.11", "v4.12", "v4.13"]);
}

#[test]
fn open_ended_clause_expands_to_the_ceiling() {
    let versions = parse("v4.18");
    assert_eq!(versions.len(), 3);
    assert_eq!(versions.first(), Some(&v(4, 18)));
    assert_eq!(versions.last(), Some(&v(4, 20)));
}

#[test]
fn open_ended_clauses_still_expand_inside_a_mix() {
    let versions = parse("v4.8,v4.10-v4.12,v4.15");
    let expected: Vec<SupportedVersion> = (8..=20).map(|minor| v(4, minor)).collect();
    assert_eq!(versions.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn mixed_specifier_without_open_ended_is_a_plain_union() {
    assert_eq!(
        strings("=v4.8, v4.10-v4.11 ,=v4.15"),
        ["v4.8", "v4.10", "v4.11", "v4.15"]
    );
}

#[test]
fn quotes_around_the_specifier_are_ignored() {
    assert_eq!(parse("\"v4.11-v4.13\""), parse("v4.11-v4.13"));
    assert_eq!(parse("'=v4.12'"), parse("=v4.12"));
}

#[test]
fn duplicates_collapse() {
    assert_eq!(strings("=v4.12,=v4.12,v4.12-v4.12"), ["v4.12"]);
}

#[test]
fn range_cardinality_is_the_inclusive_minor_count() {
    for (start, end) in [(0, 0), (1, 9), (8, 12), (0, 99), (40, 41)] {
        let specifier = format!("v4.{start}-v4.{end}");
        assert_eq!(
            parse(specifier.as_str()).len(),
            (end - start + 1) as usize,
            "cardinality of {specifier}"
        );
    }
}

#[test]
fn reversed_range_is_empty() {
    assert!(parse("v4.13-v4.11").is_empty());
}

#[test]
fn absurd_range_is_capped_without_error() {
    let versions = parse("v4.1-v9.99");
    assert_eq!(versions.len(), 99);
    assert_eq!(versions.first(), Some(&v(4, 1)));
    assert_eq!(versions.last(), Some(&v(4, 99)));
}

#[test]
fn range_with_oversized_bound_stays_a_range() {
    let specifier = "v4.1-v4294967296.0";
    assert_eq!(classify(specifier), SpecifierShape::Ranged);

    let versions = parse(specifier);
    assert_eq!(versions.len(), 99);
    assert_eq!(versions.first(), Some(&v(4, 1)));
    assert_eq!(versions.last(), Some(&v(4, 99)));
}

#[test]
fn explicit_with_oversized_number_stays_explicit() {
    assert_eq!(classify("=v99999999999.1"), SpecifierShape::Explicit);
    assert_eq!(classify("=v99999999999.1,v4.8-v4.9"), SpecifierShape::Mixed);
    assert_eq!(parse("=v4.99999999999").len(), 1);
}

#[test]
fn open_ended_with_oversized_number_is_empty() {
    assert_eq!(classify("v99999999999.0"), SpecifierShape::OpenEnded);
    assert!(parse("v99999999999.0").is_empty());
}

#[test]
fn open_ended_past_the_ceiling_is_empty() {
    assert!(parse("v4.25").is_empty());
    assert!(parse("v5.0").is_empty());
}

#[test]
fn open_ended_from_an_earlier_major_rolls_over() {
    let versions = parse("v3.19");
    assert_eq!(versions.first(), Some(&v(3, 19)));
    assert!(versions.contains(&v(3, 20)));
    assert!(versions.contains(&v(4, 0)));
    assert!(!versions.contains(&v(3, 21)));
    assert_eq!(versions.len(), 2 + 21);
}

#[test]
fn ceiling_can_be_overridden() {
    let ceiling = PlatformVersion::new(4, 22);
    let versions = parse_with_ceiling("v4.20", ceiling);
    assert_eq!(
        versions.into_iter().collect::<Vec<_>>(),
        [v(4, 20), v(4, 21), v(4, 22)]
    );
    assert_eq!(POLICY_CEILING, PlatformVersion::new(4, 20));
}

#[test]
fn unrecognized_version_like_tokens_pass_through() {
    let versions = parse("v4.x,=v4.12");
    assert!(versions.contains(&v(4, 12)));
    assert!(versions.contains(&SupportedVersion::Literal("v4.x".to_string())));
    // Concrete versions sort before literals.
    assert_eq!(versions.last(), Some(&SupportedVersion::Literal("v4.x".to_string())));

    let concrete: Vec<PlatformVersion> = versions.iter().filter_map(SupportedVersion::version).collect();
    assert_eq!(concrete, [PlatformVersion::new(4, 12)]);
}

#[test]
fn garbage_clauses_contribute_nothing() {
    assert!(parse("latest").is_empty());
    assert_eq!(strings("bogus,=v4.9"), ["v4.9"]);
}

#[test]
fn clauses_are_only_anchored_at_the_start() {
    // Trailing text after a recognized prefix is ignored.
    assert_eq!(strings("=v4.12-beta"), ["v4.12"]);
}

#[test]
fn versions_order_numerically() {
    let versions: Vec<String> = parse("=v4.10,=v4.9,=v4.100")
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(versions, ["v4.9", "v4.10", "v4.100"]);
}

#[test]
fn parse_is_idempotent() {
    for specifier in ["", "v4.8", "=v4.8,v4.10-v4.12", "v4.x", "v4.1-v9.99"] {
        assert_eq!(parse(specifier), parse(specifier));
        assert_eq!(classify(specifier), classify(specifier));
    }
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

#[test]
fn classify_single_clause_shapes() {
    assert_eq!(classify("v4.8"), SpecifierShape::OpenEnded);
    assert_eq!(classify("=v4.8"), SpecifierShape::Explicit);
    assert_eq!(classify("v4.8-v4.9"), SpecifierShape::Ranged);
}

#[test]
fn classify_mixed_and_none() {
    assert_eq!(classify("v4.8,=v4.9"), SpecifierShape::Mixed);
    assert_eq!(classify("v4.8-v4.9,=v4.12"), SpecifierShape::Mixed);
    assert_eq!(classify(""), SpecifierShape::None);
    assert_eq!(classify(None), SpecifierShape::None);
    assert_eq!(classify("latest"), SpecifierShape::None);
}

#[test]
fn repeated_clause_kind_is_not_mixed() {
    assert_eq!(classify("=v4.8,=v4.9,=v4.12"), SpecifierShape::Explicit);
    assert_eq!(classify("v4.8-v4.9,v4.12-v4.14"), SpecifierShape::Ranged);
}

#[test]
fn literal_tokens_do_not_affect_shape() {
    assert_eq!(classify("v4.x"), SpecifierShape::None);
    assert_eq!(classify("v4.x,=v4.9"), SpecifierShape::Explicit);
}

#[test]
fn shape_sets_union_across_releases() {
    let set: ShapeSet = [Some("=v4.8"), Some("v4.9-v4.10"), None]
        .into_iter()
        .map(ShapeSet::of)
        .collect();
    assert_eq!(set.len(), 2);
    assert!(set.contains(ClauseKind::Explicit));
    assert!(set.contains(ClauseKind::Ranged));
    assert!(!set.contains(ClauseKind::OpenEnded));
    assert_eq!(set.shape(), SpecifierShape::Mixed);
    assert!(ShapeSet::of("").is_empty());
}

#[test]
fn shape_fold_follows_the_collapse_rule() {
    use SpecifierShape::*;
    assert_eq!([None, None].into_iter().collect::<SpecifierShape>(), None);
    assert_eq!([Explicit, None, Explicit].into_iter().collect::<SpecifierShape>(), Explicit);
    assert_eq!([Explicit, Ranged].into_iter().collect::<SpecifierShape>(), Mixed);
    assert!(OpenEnded.is_open_ended());
    assert!(Mixed.is_open_ended());
    assert!(!Ranged.is_open_ended());
}

// ---------------------------------------------------------------------------
// PlatformVersion
// ---------------------------------------------------------------------------

#[test]
fn platform_version_parses_and_displays() {
    let version: PlatformVersion = "v4.12".parse().unwrap();
    assert_eq!(version, PlatformVersion::new(4, 12));
    assert_eq!(version.to_string(), "v4.12");
    assert_eq!("4.9".parse::<PlatformVersion>().unwrap(), PlatformVersion::new(4, 9));
}

#[test]
fn platform_version_rejects_malformed_text() {
    for bad in ["", "v4", "v4.", "v.12", "v4.12.1", "=v4.12", "v4.x"] {
        assert!(bad.parse::<PlatformVersion>().is_err(), "{bad:?} should not parse");
    }
}
