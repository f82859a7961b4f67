//! ACFTA, aircraft information. Three historical layouts share the tag.

use super::{alpha, numeric, table};
use crate::field::FieldDescriptor;
use crate::plugin::BuiltinPlugin;
use crate::schema::{DescriptionSet, VariantLength};

/// Version 1.0.
const ACFTA_132: &[FieldDescriptor] = &[
	alpha(10, "Aircraft Mission ID", "AC_MSN_ID"),
	alpha(1, "Scene Type", "SCTYPE"),
	alpha(4, "Scene No.", "SCNUM"),
	alpha(3, "Sensor ID", "SENSOR_ID"),
	alpha(4, "Total No. of Patches", "PATCH_TOT"),
	alpha(3, "Total No. of MTI Packets", "MTI_TOT"),
	alpha(7, "Processing Date", "PDATE"),
	alpha(3, "Immediate Scene Host", "IMHOSTNO"),
	alpha(5, "Immediate Scene Req ID", "IMREQID"),
	alpha(1, "Scene Source", "SCENE_SOURCE"),
	alpha(2, "Mission Plan Mode", "MPLAN"),
	alpha(21, "Entry Location", "ENTLOC"),
	alpha(6, "Entry Altitude", "ENTALT"),
	alpha(21, "Exit Location", "EXITLOC"),
	alpha(6, "Exit Altitude", "EXITALT"),
	alpha(7, "True Map Angle", "TMAP"),
	alpha(3, "RCS Calibration Coef.", "RCS"),
	alpha(7, "Row Spacing", "ROW_SPACING"),
	alpha(7, "Col Spacing", "COL_SPACING"),
	alpha(4, "Sensor Serial No.", "SENSERIAL"),
	alpha(7, "Airborne SW Version", "ABSWVER"),
];

/// Draft 0.9a.
const ACFTA_154: &[FieldDescriptor] = &[
	alpha(10, "Aircraft Mission ID", "AC_MSN_ID"),
	alpha(10, "Aircraft Tail Number", "AC_TAIL_NO"),
	alpha(10, "Sensor ID", "SENSOR_ID"),
	alpha(1, "Scene Source", "SCENE_SOURCE"),
	alpha(6, "Scene No.", "SCNUM"),
	alpha(8, "Processing Date", "PDATE"),
	alpha(6, "Immediate Scene Host", "IMHOSTNO"),
	alpha(5, "Immediate Scene Req ID", "IMREQID"),
	alpha(3, "Mission Plan Mode", "MPLAN"),
	alpha(21, "Entry Location", "ENTLOC"),
	alpha(6, "Entry Altitude", "ENTALT"),
	alpha(21, "Exit Location", "EXITLOC"),
	alpha(6, "Exit Altitude", "EXITALT"),
	alpha(7, "True Map Angle", "TMAP"),
	alpha(7, "Row Spacing", "ROW_SPACING"),
	alpha(7, "Col Spacing", "COL_SPACING"),
	alpha(6, "Sensor Serial No.", "SENSERIAL"),
	alpha(7, "Airborne SW Version", "ABSWVER"),
	alpha(4, "Total No. of Patches", "PATCH_TOT"),
	alpha(3, "Total No. of MTI Packets", "MTI_TOT"),
];

/// Legacy ASARS-2 products; resembles a draft of ACFTB.
///
/// Some layouts in circulation carry a one-byte spacing-units field before
/// `ROW_SPACING`, which would make the record 200 bytes. It is omitted so the
/// widths match the 199 bytes the variant is selected by.
const ACFTA_199: &[FieldDescriptor] = &[
	alpha(20, "Aircraft Mission ID", "AC_MSN_ID"),
	alpha(10, "Aircraft Tail Number", "AC_TAIL_NO"),
	alpha(12, "Acrft Takeoff Date/Time", "AC_TO"),
	alpha(4, "Sensor ID Type", "SENSOR_ID_TYPE"),
	alpha(6, "Sensor ID", "SENSOR_ID"),
	numeric(1, "Scene Source", "SCENE_SOURCE"),
	numeric(6, "Scene No.", "SCNUM"),
	numeric(8, "Processing Date", "PDATE"),
	numeric(6, "Immediate Scene Host", "IMHOSTNO"),
	numeric(5, "Immediate Scene Req ID", "IMREQID"),
	numeric(3, "Mission Plan Mode", "MPLAN"),
	alpha(25, "Entry Location", "ENTLOC"),
	alpha(6, "Entry Elevation", "ENTELV"),
	alpha(1, "Elevation Units", "ELVUNIT"),
	alpha(25, "Exit Location", "EXITLOC"),
	alpha(6, "Exit Elevation", "EXITELV"),
	alpha(7, "True Map Angle", "TMAP"),
	alpha(7, "Row Spacing", "ROW_SPACING"),
	alpha(7, "Col Spacing", "COL_SPACING"),
	alpha(6, "Sensor Focal Length", "FOCAL_LENGTH"),
	alpha(6, "Sensor Serial No.", "SENSERIAL"),
	alpha(7, "Airborne SW Version", "ABSWVER"),
	alpha(8, "Calibration Date", "CAL_DATE"),
	numeric(4, "Total No. of Patches", "PATCH_TOT"),
	alpha(3, "Total No. of MTI Packets", "MTI_TOT"),
];

pub fn describe() -> DescriptionSet {
	DescriptionSet::new("ACFTA")
		.with_variant("ACFTA_132", table(ACFTA_132), VariantLength::Fixed(132))
		.with_variant("ACFTA_154", table(ACFTA_154), VariantLength::Fixed(154))
		.with_variant("ACFTA_199", table(ACFTA_199), VariantLength::Fixed(199))
}

inventory::submit!(BuiltinPlugin {
	tag: "ACFTA",
	describe,
});
