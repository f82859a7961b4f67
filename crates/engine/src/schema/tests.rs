use super::*;
use crate::field::{FieldDescriptor, FieldMap};

fn tag() -> Tag {
	Tag::new("ACFTA").unwrap()
}

fn padded(width: usize) -> DescriptionTable {
	DescriptionTable::new(vec![
		FieldDescriptor::alpha(10, "Aircraft Mission ID", "AC_MSN_ID"),
		FieldDescriptor::alpha(width - 10, "Filler", "FILLER"),
	])
}

fn three_lengths() -> DescriptionSet {
	DescriptionSet::new("ACFTA")
		.with_variant("ACFTA_132", padded(132), VariantLength::Fixed(132))
		.with_variant("ACFTA_154", padded(154), VariantLength::Fixed(154))
		.with_variant("ACFTA_199", padded(199), VariantLength::Fixed(199))
}

fn count(fields: &FieldMap) -> Option<usize> {
	fields.integer("COUNT").and_then(|n| usize::try_from(n).ok())
}

fn repeated() -> DescriptionTable {
	DescriptionTable::new(vec![
		FieldDescriptor::numeric(2, "Count", "COUNT"),
		FieldDescriptor::alpha(0, "Items", "ITEMS").with_length_hook(count),
	])
}

#[test]
fn selects_only_the_exact_length() {
	let set = three_lengths();
	set.validate().unwrap();
	assert_eq!(set.select(tag(), 132).unwrap().name, "ACFTA_132");
	assert_eq!(set.select(tag(), 154).unwrap().name, "ACFTA_154");
	assert_eq!(set.select(tag(), 199).unwrap().name, "ACFTA_199");
}

#[test]
fn unmatched_length_without_fallback_fails() {
	assert_eq!(
		three_lengths().select(tag(), 140).unwrap_err(),
		SelectionError::UnknownVariant {
			tag: tag(),
			raw_len: 140,
		}
	);
}

#[test]
fn falls_back_to_the_variable_variant() {
	let set = three_lengths().with_variant("ACFTA_VAR", repeated(), VariantLength::Variable);
	set.validate().unwrap();
	assert_eq!(set.select(tag(), 140).unwrap().name, "ACFTA_VAR");
	// Exact matches still take precedence.
	assert_eq!(set.select(tag(), 154).unwrap().name, "ACFTA_154");
}

#[test]
fn same_length_variants_are_ambiguous() {
	let set = three_lengths().with_variant("ACFTA_132B", padded(132), VariantLength::Fixed(132));
	assert_eq!(
		set.validate(),
		Err(SchemaError::AmbiguousVariants {
			first: "ACFTA_132".into(),
			second: "ACFTA_132B".into(),
			length: 132,
		})
	);
}

#[test]
fn at_most_one_variable_variant() {
	let set = DescriptionSet::new("X")
		.with_variant("A", repeated(), VariantLength::Variable)
		.with_variant("B", repeated(), VariantLength::Variable);
	assert!(matches!(
		set.validate(),
		Err(SchemaError::MultipleVariable { .. })
	));
}

#[test]
fn declared_length_must_match_widths() {
	let set = DescriptionSet::new("X").with_variant("A", padded(132), VariantLength::Fixed(130));
	assert_eq!(
		set.validate(),
		Err(SchemaError::LengthMismatch {
			variant: "A".into(),
			declared: 130,
			actual: 132,
		})
	);
}

#[test]
fn fixed_variants_cannot_carry_hooks() {
	let set = DescriptionSet::new("X").with_variant("A", repeated(), VariantLength::Fixed(2));
	assert_eq!(
		set.validate(),
		Err(SchemaError::HookInFixedVariant {
			variant: "A".into(),
			field: "ITEMS".into(),
		})
	);
}

#[test]
fn malformed_tables_are_rejected() {
	let empty = DescriptionSet::single("X", DescriptionTable::default());
	assert!(matches!(empty.validate(), Err(SchemaError::EmptyTable { .. })));

	let zero = DescriptionSet::single(
		"X",
		DescriptionTable::new(vec![FieldDescriptor::alpha(0, "Nothing", "NIL")]),
	);
	assert!(matches!(zero.validate(), Err(SchemaError::ZeroWidth { .. })));

	let dup = DescriptionSet::single(
		"X",
		DescriptionTable::new(vec![
			FieldDescriptor::alpha(2, "One", "A"),
			FieldDescriptor::alpha(2, "Two", "A"),
		]),
	);
	assert_eq!(
		dup.validate(),
		Err(SchemaError::DuplicateField {
			variant: "X".into(),
			field: "A".into(),
		})
	);

	let inverted = DescriptionSet::single(
		"X",
		DescriptionTable::new(vec![FieldDescriptor::numeric(2, "N", "N").bounded(9, 1)]),
	);
	assert!(matches!(
		inverted.validate(),
		Err(SchemaError::InvalidRange { min: 9, max: 1, .. })
	));

	let wide = |width| {
		DescriptionSet::single(
			"X",
			DescriptionTable::new(vec![FieldDescriptor::numeric(width, "N", "N")]),
		)
	};
	wide(19).validate().unwrap();
	assert!(matches!(
		wide(20).validate(),
		Err(SchemaError::NumericTooWide { width: 20, .. })
	));
	DescriptionSet::single(
		"X",
		DescriptionTable::new(vec![FieldDescriptor::alpha(40, "A", "A")]),
	)
	.validate()
	.unwrap();

	assert!(matches!(
		DescriptionSet::new("X").validate(),
		Err(SchemaError::EmptySet { .. })
	));
}

#[test]
fn single_derives_length_from_the_table() {
	let fixed = DescriptionSet::single("SENSRA", padded(132));
	assert_eq!(fixed.variants()[0].length, VariantLength::Fixed(132));
	assert_eq!(fixed.variants()[0].name, "SENSRA");

	let hooked = DescriptionSet::single("X", repeated());
	assert!(hooked.variants()[0].is_variable());
	hooked.validate().unwrap();
}

#[test]
fn default_variant_must_exist() {
	let set = three_lengths();
	assert_eq!(set.default_variant().unwrap().name, "ACFTA_132");

	let set = three_lengths().with_default("ACFTA_199");
	assert_eq!(set.default_variant().unwrap().name, "ACFTA_199");

	assert!(matches!(
		three_lengths().with_default("ACFTA_200").validate(),
		Err(SchemaError::UnknownDefault { .. })
	));
}
