//! PIAEQA, profile for imagery access: equipment.

use super::{alpha, table};
use crate::field::FieldDescriptor;
use crate::plugin::BuiltinPlugin;
use crate::schema::DescriptionSet;

const FIELDS: &[FieldDescriptor] = &[
	alpha(7, "Equipment Code", "EQPCODE"),
	alpha(45, "Equipment Nomenclature", "EQPNOMEN"),
	alpha(64, "Equipment Manufacturer", "EQPMAN"),
	alpha(1, "OB Type", "OBTYPE"),
	alpha(3, "Type Order of Battle", "ORDBAT"),
	alpha(2, "Country Produced", "CTRYPROD"),
	alpha(2, "Country Code Designed", "CTRYDSN"),
	alpha(6, "Object View", "OBJVIEW"),
];

pub fn describe() -> DescriptionSet {
	DescriptionSet::single("PIAEQA", table(FIELDS))
}

inventory::submit!(BuiltinPlugin {
	tag: "PIAEQA",
	describe,
});
