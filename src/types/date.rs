use juniper::GraphQLScalar;

///
/// Date custom scalar type
///
/// The value is opaque text: it is passed through unchanged in both
/// directions and never parsed as a calendar date. Literals other than
/// integers carry no value and are written as `NULL`.
///
#[derive(GraphQLScalar, Clone, Debug, PartialEq, Eq)]
#[graphql(with = date_scalar)]
pub struct Date(Option<String>);

impl Date {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(Some(value.into()))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

mod date_scalar {
    use juniper::{InputValue, ParseScalarResult, ScalarToken, ScalarValue, Value};

    use super::Date;

    pub(super) fn to_output<S: ScalarValue>(v: &Date) -> Value<S> {
        match &v.0 {
            Some(text) => Value::scalar(text.clone()),
            None => Value::null(),
        }
    }

    pub(super) fn from_input<S: ScalarValue>(v: &InputValue<S>) -> Result<Date, String> {
        let InputValue::Scalar(scalar) = v else {
            return Err(format!("Expected a scalar for `Date`, found: {v}"));
        };
        if let Some(text) = scalar.as_str() {
            return Ok(Date::new(text));
        }
        if let Some(int) = scalar.as_int() {
            return Ok(Date::new(int.to_string()));
        }
        if let Some(float) = scalar.as_float() {
            // NaN only ever comes from `parse_token`: JSON variables cannot carry it
            if float.is_nan() {
                return Ok(Date::absent());
            }
            return Ok(Date::new(float.to_string()));
        }
        match scalar.as_bool() {
            Some(flag) => Ok(Date::new(flag.to_string())),
            None => Err(format!("Unsupported `Date` value: {v}")),
        }
    }

    /// Integer literals keep their raw text, any other literal is absent.
    pub(super) fn parse_token<S: ScalarValue>(token: ScalarToken<'_>) -> ParseScalarResult<S> {
        match token {
            ScalarToken::Int(raw) => Ok(S::from(raw.to_owned())),
            ScalarToken::Float(_) | ScalarToken::String(_) => Ok(S::from(f64::NAN)),
        }
    }
}

#[cfg(test)]
mod tests {
    use juniper::{DefaultScalarValue, InputValue, ScalarToken, Value};
    use rstest::rstest;

    use super::*;

    fn parse_literal(token: ScalarToken<'_>) -> Result<Date, String> {
        let scalar = date_scalar::parse_token::<DefaultScalarValue>(token)
            .map_err(|err| format!("{err:?}"))?;
        date_scalar::from_input(&InputValue::Scalar(scalar))
    }

    #[test]
    fn integer_literal_keeps_raw_text() {
        let scalar = date_scalar::parse_token::<DefaultScalarValue>(ScalarToken::Int("20240101"))
            .expect("integer literal parses");
        assert_eq!(scalar, DefaultScalarValue::String("20240101".to_owned()));
        assert_eq!(
            parse_literal(ScalarToken::Int("20240101")),
            Ok(Date::new("20240101"))
        );
    }

    #[rstest]
    #[case(ScalarToken::String("2024-01-01"))]
    #[case(ScalarToken::Float("2024.0101"))]
    fn non_integer_literal_is_absent(#[case] token: ScalarToken<'static>) {
        assert_eq!(parse_literal(token), Ok(Date::absent()));
    }

    #[rstest]
    #[case(InputValue::scalar("2024-01-01".to_owned()), Date::new("2024-01-01"))]
    #[case(InputValue::scalar(20240101), Date::new("20240101"))]
    #[case(InputValue::scalar(2.5), Date::new("2.5"))]
    #[case(InputValue::scalar(true), Date::new("true"))]
    fn scalar_variable_is_passed_through(
        #[case] input: InputValue<DefaultScalarValue>,
        #[case] expected: Date,
    ) {
        assert_eq!(date_scalar::from_input(&input), Ok(expected));
    }

    #[test]
    fn list_variable_is_rejected() {
        let input = InputValue::<DefaultScalarValue>::list(vec![InputValue::scalar(1)]);
        assert!(date_scalar::from_input(&input).is_err());
    }

    #[test]
    fn output_is_unchanged() {
        let output: Value<DefaultScalarValue> = date_scalar::to_output(&Date::new("not even a date"));
        assert_eq!(output, Value::scalar("not even a date".to_owned()));
        let output: Value<DefaultScalarValue> = date_scalar::to_output(&Date::absent());
        assert_eq!(output, Value::null());
    }
}
