use proptest::prelude::*;

use super::*;

fn nswaths() -> FieldDescriptor {
	FieldDescriptor::numeric(4, "N Swaths", "NSWATHS")
}

#[test]
fn alpha_trims_trailing_pad_only() {
	let desc = FieldDescriptor::alpha(10, "Aircraft Mission ID", "AC_MSN_ID");
	let value = decode(b"  MSN42   rest", 0, &desc).unwrap();
	assert_eq!(value, FieldValue::Text("  MSN42".into()));
	assert_eq!(encode(&value, &desc).unwrap(), b"  MSN42   ");
}

#[test]
fn blank_alpha_depends_on_presence_rule() {
	let loose = FieldDescriptor::alpha(6, "Object View", "OBJVIEW");
	let strict = loose.clone().required();

	assert_eq!(decode(b"      ", 0, &loose).unwrap(), FieldValue::Text(String::new()));
	assert_eq!(decode(b"      ", 0, &strict), Err(FieldError::BlankViolation));
	assert_eq!(
		encode(&FieldValue::Text(String::new()), &strict),
		Err(FieldError::BlankViolation)
	);
}

#[test]
fn blank_numeric_depends_on_presence_rule() {
	let loose = nswaths();
	let strict = nswaths().required();

	assert_eq!(decode(b"    ", 0, &loose).unwrap(), FieldValue::Blank);
	assert_eq!(decode(b"    ", 0, &strict), Err(FieldError::BlankViolation));
	assert_eq!(encode(&FieldValue::Blank, &loose).unwrap(), b"    ");
}

#[test]
fn range_rule_applies_on_decode() {
	let desc = nswaths().bounded(0, 53);
	assert_eq!(decode(b"0003", 0, &desc).unwrap().as_i64(), Some(3));
	assert_eq!(
		decode(b"0099", 0, &desc),
		Err(FieldError::RangeViolation {
			value: "99".into(),
			min: 0,
			max: 53,
		})
	);
}

#[test]
fn range_rule_applies_before_encode() {
	let desc = nswaths().bounded(0, 53);
	assert!(matches!(
		encode(&FieldValue::from(54_i64), &desc),
		Err(FieldError::RangeViolation { .. })
	));
	assert!(matches!(
		encode(&FieldValue::from(-1_i64), &desc),
		Err(FieldError::RangeViolation { .. })
	));
}

#[test]
fn numeric_zero_pads_on_the_left() {
	let desc = nswaths();
	assert_eq!(encode(&FieldValue::from(3_i64), &desc).unwrap(), b"0003");
	assert_eq!(encode(&FieldValue::from(-3_i64), &desc).unwrap(), b"-003");
	assert_eq!(
		encode(&FieldValue::from(Numeric::from_i64(3).with_sign()), &desc).unwrap(),
		b"+003"
	);
	assert_eq!(
		encode(&FieldValue::from(12345_i64), &desc),
		Err(FieldError::ValueTooLong { len: 5, width: 4 })
	);
}

#[test]
fn signs_and_decimals_survive_re_encoding() {
	let desc = FieldDescriptor::numeric(6, "Sensor Pitch", "SNSPITCH");
	for raw in [
		&b"+01.50"[..],
		b"-00.25",
		b"-00000",
		b"000.05",
		b"123456",
		b"+.0005",
	] {
		let value = decode(raw, 0, &desc).unwrap();
		assert_eq!(encode(&value, &desc).unwrap(), raw, "{:?}", String::from_utf8_lossy(raw));
	}

	let pitch = decode(b"-01.50", 0, &desc).unwrap().as_number().unwrap();
	assert_eq!(pitch.scale(), 2);
	assert_eq!(pitch.mantissa(), Some(-150));
	assert_eq!(pitch.as_i64(), None);
	assert!((pitch.as_f64() + 1.5).abs() < f64::EPSILON);
}

#[test]
fn decimal_bounds_compare_exactly() {
	let desc = FieldDescriptor::numeric(5, "Ground Track", "GRDTRACK").bounded(0, 360);
	assert!(decode(b"360.0", 0, &desc).is_ok());
	assert!(matches!(
		decode(b"360.1", 0, &desc),
		Err(FieldError::RangeViolation { .. })
	));
}

#[test]
fn numeric_charset_is_strict() {
	let desc = nswaths();
	let cases: [(&[u8], u8, usize); 5] = [
		(b"00 3", b' ', 2),
		(b"0x03", b'x', 1),
		(b"003-", b'-', 3),
		(b"003.", b'.', 3),
		(b"1.2.", b'.', 3),
	];
	for (raw, byte, position) in cases {
		assert_eq!(
			decode(raw, 0, &desc),
			Err(FieldError::CharsetViolation {
				kind: FieldKind::NumericText,
				byte,
				position,
			}),
			"{:?}",
			String::from_utf8_lossy(raw)
		);
	}
	assert_eq!(
		decode(b"-", 0, &FieldDescriptor::numeric(1, "Sign", "S")),
		Err(FieldError::CharsetViolation {
			kind: FieldKind::NumericText,
			byte: b'-',
			position: 0,
		})
	);
}

#[test]
fn alpha_rejects_control_and_high_bytes() {
	let desc = FieldDescriptor::alpha(4, "Sensor ID", "SENSOR_ID");
	assert_eq!(
		decode(b"AB\x00D", 0, &desc),
		Err(FieldError::CharsetViolation {
			kind: FieldKind::AlphaText,
			byte: 0,
			position: 2,
		})
	);
	assert!(matches!(
		decode(b"\xc3\xa9AB", 0, &desc),
		Err(FieldError::CharsetViolation { byte: 0xc3, .. })
	));
	assert!(matches!(
		encode(&FieldValue::from("caf\u{e9}"), &desc),
		Err(FieldError::CharsetViolation { .. })
	));
}

#[test]
fn encode_rejects_wrong_value_family() {
	assert_eq!(
		encode(&FieldValue::from("12"), &nswaths()),
		Err(FieldError::TypeMismatch {
			expected: FieldKind::NumericText
		})
	);
	assert_eq!(
		encode(&FieldValue::from(12_i64), &FieldDescriptor::alpha(4, "Scene No.", "SCNUM")),
		Err(FieldError::TypeMismatch {
			expected: FieldKind::AlphaText
		})
	);
}

#[test]
fn decode_reports_truncation_and_overflow() {
	assert_eq!(
		decode(b"00", 0, &nswaths()),
		Err(FieldError::Truncated {
			needed: 4,
			available: 2,
		})
	);
	let wide = FieldDescriptor::numeric(21, "Huge", "HUGE");
	assert!(matches!(
		decode(b"999999999999999999999", 0, &wide),
		Err(FieldError::Overflow { .. })
	));
}

proptest! {
	#[test]
	fn alpha_field_round_trips(raw in "[ -~]{0,12}") {
		let desc = FieldDescriptor::alpha(12, "Free Text", "TEXT");
		let mut bytes = raw.clone().into_bytes();
		bytes.resize(12, b' ');
		let value = decode(&bytes, 0, &desc).unwrap();
		prop_assert_eq!(encode(&value, &desc).unwrap(), bytes);
	}

	#[test]
	fn numeric_field_round_trips(raw in "[+-]?[0-9]{1,3}(\\.[0-9]{1,3})?") {
		let width = raw.len() + 1;
		let desc = FieldDescriptor::new(FieldKind::NumericText, width, "Value", "VALUE");
		let bytes = match raw.strip_prefix(['+', '-']) {
			Some(rest) => format!("{}0{}", &raw[..1], rest),
			None => format!("0{raw}"),
		};
		let value = decode(bytes.as_bytes(), 0, &desc).unwrap();
		prop_assert_eq!(encode(&value, &desc).unwrap(), bytes.into_bytes());
	}
}
