//! Conversion of literal strings into setter parameter types.

use crate::error::LiteralError;
use std::any::type_name;

/// A setter parameter type that can be parsed from a definition literal.
pub trait FromLiteral: Sized + Send + Sync + 'static {
  fn from_literal(literal: &str) -> Result<Self, LiteralError>;
}

fn reject<T>(literal: &str) -> LiteralError {
  LiteralError {
    literal: literal.to_owned(),
    target: type_name::<T>(),
  }
}

macro_rules! parsed_literal {
  ($($ty:ty),* $(,)?) => {
    $(
      impl FromLiteral for $ty {
        fn from_literal(literal: &str) -> Result<Self, LiteralError> {
          literal.parse::<$ty>().map_err(|_| reject::<$ty>(literal))
        }
      }
    )*
  };
}

// int, byte, short and long first; the rest are conveniences.
parsed_literal!(i32, i8, i16, i64);
parsed_literal!(u8, u16, u32, u64, usize, isize, f32, f64, char);

impl FromLiteral for bool {
  fn from_literal(literal: &str) -> Result<Self, LiteralError> {
    if literal.eq_ignore_ascii_case("true") {
      Ok(true)
    } else if literal.eq_ignore_ascii_case("false") {
      Ok(false)
    } else {
      Err(reject::<bool>(literal))
    }
  }
}

impl FromLiteral for String {
  fn from_literal(literal: &str) -> Result<Self, LiteralError> {
    Ok(literal.to_owned())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn integers_parse_within_their_width() {
    assert_eq!(i32::from_literal("42"), Ok(42));
    assert_eq!(i32::from_literal("-7"), Ok(-7));
    assert_eq!(i8::from_literal("127"), Ok(127));
    assert_eq!(i16::from_literal("-32768"), Ok(-32768));
    assert_eq!(i64::from_literal("9000000000"), Ok(9_000_000_000));

    let err = i8::from_literal("128").unwrap_err();
    assert_eq!(err.literal, "128");
    assert_eq!(err.target, "i8");
  }

  #[test]
  fn integers_reject_padding_and_text() {
    assert!(i32::from_literal(" 42").is_err());
    assert!(i32::from_literal("forty-two").is_err());
    assert!(i64::from_literal("").is_err());
  }

  #[test]
  fn booleans_are_strict_but_case_insensitive() {
    assert_eq!(bool::from_literal("true"), Ok(true));
    assert_eq!(bool::from_literal("TRUE"), Ok(true));
    assert_eq!(bool::from_literal("False"), Ok(false));
    assert!(bool::from_literal("yes").is_err());
    assert!(bool::from_literal("1").is_err());
  }

  #[test]
  fn strings_pass_through_untouched() {
    assert_eq!(String::from_literal(" POP3 "), Ok(" POP3 ".to_string()));
    assert_eq!(String::from_literal(""), Ok(String::new()));
  }
}
