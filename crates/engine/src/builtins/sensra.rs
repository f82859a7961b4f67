use super::{alpha, numeric, table};
use crate::field::FieldDescriptor;
use crate::plugin::BuiltinPlugin;
use crate::schema::DescriptionSet;

const FIELDS: &[FieldDescriptor] = &[
	numeric(8, "Ref Row", "REFROW"),
	numeric(8, "Ref Col", "REFCOL"),
	alpha(6, "Sensor Model", "SNSMODEL"),
	alpha(3, "Sensor Mount", "SNSMOUNT"),
	alpha(21, "Sensor Loc", "SENSLOC"),
	alpha(1, "Sensor Alt Src", "SNALTSRC"),
	alpha(6, "Sensor Alt", "SENSALT"),
	alpha(1, "Sensor Alt Unit", "SNALUNIT"),
	alpha(5, "Sensor AGL", "SENSAGL"),
	alpha(7, "Sensor Pitch", "SNSPITCH"),
	alpha(8, "Sensor Roll", "SENSROLL"),
	alpha(8, "Sensor Yaw", "SENSYAW"),
	alpha(7, "Platform Pitch", "PLTPITCH"),
	alpha(8, "Platform Roll", "PLATROLL"),
	alpha(5, "Platform Hdg", "PLATHDG"),
	alpha(1, "Ground Spd Src", "GRSPDSRC"),
	alpha(6, "Ground Speed", "GRDSPEED"),
	alpha(1, "Ground Spd Unit", "GRSPUNIT"),
	alpha(5, "Ground Track", "GRDTRACK"),
	alpha(5, "Vertical Vel", "VERTVEL"),
	alpha(1, "Vert Vel Unit", "VERTVELU"),
	alpha(4, "Swath Frames", "SWATHFRM"),
	numeric(4, "N Swaths", "NSWATHS"),
	numeric(3, "Spot Num", "SPOTNUM"),
];

/// SENSRA, sensor parameters.
pub fn describe() -> DescriptionSet {
	DescriptionSet::single("SENSRA", table(FIELDS))
}

inventory::submit!(BuiltinPlugin {
	tag: "SENSRA",
	describe,
});
