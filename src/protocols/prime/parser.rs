//! Prime protocol request decoder and response encoder.

use bytes::BytesMut;
use serde_json::{json, Number, Value};
use thiserror::Error;

/// The only method this protocol answers.
pub const METHOD: &str = "isPrime";

/// Response line sent for any rejected request.
const MALFORMED: &[u8] = b"malformed\n";

/// Digits in `i64::MAX`; any integer magnitude with more digits is out of range.
const I64_MAX_DIGITS: usize = 19;

/// A decoded, validated `isPrime` request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    number: Number,
}

impl Request {
    pub fn method(&self) -> &'static str {
        METHOD
    }

    /// The number exactly as it appeared on the wire.
    pub fn number(&self) -> &Number {
        &self.number
    }

    /// Classify the number for evaluation.
    pub fn operand(&self) -> Operand {
        Operand::from_number(&self.number)
    }
}

/// What a request's number means to the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// An integer representable as `i64`.
    Integer(i64),
    /// Has a non-zero fractional part.
    NonIntegral,
    /// An integer outside `[i64::MIN, i64::MAX]`.
    OutOfRange,
}

impl Operand {
    fn from_number(number: &Number) -> Self {
        if let Some(n) = number.as_i64() {
            return Operand::Integer(n);
        }
        Operand::from_literal(&number.to_string())
    }

    /// Classify a JSON number literal without a lossy float conversion.
    ///
    /// The literal is reduced to `significand * 10^scale` with no trailing
    /// zeros in the significand; a negative scale then means a fractional part.
    fn from_literal(literal: &str) -> Self {
        let (negative, unsigned) = match literal.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, literal),
        };
        let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => (&unsigned[..pos], parse_exponent(&unsigned[pos + 1..])),
            None => (unsigned, 0),
        };
        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let digits: Vec<u8> = whole
            .bytes()
            .chain(fraction.bytes())
            .skip_while(|&b| b == b'0')
            .collect();
        let Some(last_nonzero) = digits.iter().rposition(|&b| b != b'0') else {
            return Operand::Integer(0);
        };
        let significand = &digits[..=last_nonzero];
        let trailing_zeros = (digits.len() - significand.len()) as i64;

        let scale = exponent
            .saturating_sub(fraction.len() as i64)
            .saturating_add(trailing_zeros);
        if scale < 0 {
            return Operand::NonIntegral;
        }
        if scale.saturating_add(significand.len() as i64) > I64_MAX_DIGITS as i64 {
            return Operand::OutOfRange;
        }

        let mut magnitude = significand
            .iter()
            .fold(0i128, |acc, &b| acc * 10 + i128::from(b - b'0'));
        for _ in 0..scale {
            magnitude *= 10;
        }
        let value = if negative { -magnitude } else { magnitude };

        match i64::try_from(value) {
            Ok(n) => Operand::Integer(n),
            Err(_) => Operand::OutOfRange,
        }
    }
}

/// Parse a JSON exponent (`[+-]digits`), saturating on overflow.
fn parse_exponent(exponent: &str) -> i64 {
    let (negative, digits) = match exponent.as_bytes().first() {
        Some(b'-') => (true, &exponent[1..]),
        Some(b'+') => (false, &exponent[1..]),
        _ => (false, exponent),
    };
    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Why a request line was rejected.
///
/// Clients only ever see `malformed`; the reason is for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("line is not valid JSON")]
    InvalidJson,
    #[error("request is not a JSON object")]
    NotObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("unsupported method")]
    UnknownMethod,
    #[error("`number` is not a JSON number")]
    NotNumeric,
}

/// Decode and validate one request line.
///
/// Checks run in order and the first failure wins: JSON syntax, object
/// shape, presence of `method` and `number`, the method name, and finally
/// the type of `number`. Extra fields are ignored.
pub fn decode(line: &[u8]) -> Result<Request, Malformed> {
    let value: Value = serde_json::from_slice(line).map_err(|_| Malformed::InvalidJson)?;
    let Value::Object(mut object) = value else {
        return Err(Malformed::NotObject);
    };

    let method = object
        .remove("method")
        .ok_or(Malformed::MissingField("method"))?;
    let number = object
        .remove("number")
        .ok_or(Malformed::MissingField("number"))?;

    if method.as_str() != Some(METHOD) {
        return Err(Malformed::UnknownMethod);
    }

    match number {
        Value::Number(number) => Ok(Request { number }),
        _ => Err(Malformed::NotNumeric),
    }
}

/// A response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// `{"method":"isPrime","prime":<bool>}`
    Prime(bool),
    /// `malformed`
    Malformed,
}

impl Response {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Response::Malformed)
    }

    /// Encode the response, including its trailing newline.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf
    }

    /// Encode the response into an existing buffer.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        match self {
            Response::Prime(prime) => {
                let body = json!({ "method": METHOD, "prime": prime });
                buf.extend_from_slice(body.to_string().as_bytes());
                buf.extend_from_slice(b"\n");
            }
            Response::Malformed => buf.extend_from_slice(MALFORMED),
        }
    }
}
