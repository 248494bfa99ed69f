//! Turning values into the bytes that get hashed.
//!
//! A filter never hashes a value directly. It asks its [`Decomposer`] to
//! write a canonical byte form into a [`ByteSink`] and hashes those bytes.
//! Two values are treated as the same item iff their decomposed bytes are
//! equal.
//!
//! [`DefaultDecomposer`] covers every type implementing [`Decompose`]:
//! strings, byte slices, integers, floats, `bool` and `char`. Domain types
//! either implement [`Decompose`] or supply their own [`Decomposer`], and a
//! plain closure works too:
//!
//! ```
//! use bloomkit::decompose::{ByteSink, Decomposer};
//!
//! struct User { id: u64, email: String }
//!
//! let by_email = |user: &User, sink: &mut ByteSink| {
//!     sink.put_str(&user.email.to_lowercase());
//! };
//!
//! let mut sink = ByteSink::default();
//! by_email.decompose(&User { id: 7, email: "A@B.io".into() }, &mut sink);
//! assert_eq!(sink.as_bytes(), b"a@b.io");
//! ```

pub mod charset;
pub mod sink;

pub use charset::TextEncoding;
pub use sink::ByteSink;

/// Writes a canonical byte representation of `T` into a sink.
///
/// Implementations must be deterministic and stateless. Equal values must
/// produce equal bytes.
pub trait Decomposer<T: ?Sized>: Send + Sync {
    /// Write `object` into `sink`.
    fn decompose(&self, object: &T, sink: &mut ByteSink);
}

impl<T, F> Decomposer<T> for F
where
    T: ?Sized,
    F: Fn(&T, &mut ByteSink) + Send + Sync,
{
    fn decompose(&self, object: &T, sink: &mut ByteSink) {
        self(object, sink);
    }
}

/// Types with a built-in canonical byte form.
pub trait Decompose {
    /// Write `self` into `sink`.
    fn decompose_into(&self, sink: &mut ByteSink);
}

/// Decomposer for any [`Decompose`] type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecomposer;

impl<T: Decompose + ?Sized> Decomposer<T> for DefaultDecomposer {
    #[inline]
    fn decompose(&self, object: &T, sink: &mut ByteSink) {
        object.decompose_into(sink);
    }
}

impl Decompose for str {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_str(self);
    }
}

impl Decompose for String {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_str(self);
    }
}

impl Decompose for [u8] {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_bytes(self);
    }
}

impl Decompose for Vec<u8> {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_bytes(self);
    }
}

impl Decompose for u8 {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_byte(*self);
    }
}

impl Decompose for i8 {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_bytes(&self.to_be_bytes());
    }
}

impl Decompose for bool {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_bool(*self);
    }
}

impl Decompose for char {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_char(*self);
    }
}

impl Decompose for f32 {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_f32(*self);
    }
}

impl Decompose for f64 {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_f64(*self);
    }
}

macro_rules! decompose_int {
    ($($ty:ty => $put:ident),* $(,)?) => {
        $(
            impl Decompose for $ty {
                #[inline]
                fn decompose_into(&self, sink: &mut ByteSink) {
                    sink.$put(*self);
                }
            }
        )*
    };
}

decompose_int! {
    u16 => put_u16,
    u32 => put_u32,
    u64 => put_u64,
    u128 => put_u128,
    i16 => put_i16,
    i32 => put_i32,
    i64 => put_i64,
    i128 => put_i128,
}

// usize/isize are widened so the bytes do not depend on the target.
impl Decompose for usize {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_u64(*self as u64);
    }
}

impl Decompose for isize {
    fn decompose_into(&self, sink: &mut ByteSink) {
        sink.put_i64(*self as i64);
    }
}

impl<T: Decompose + ?Sized> Decompose for &T {
    fn decompose_into(&self, sink: &mut ByteSink) {
        (**self).decompose_into(sink);
    }
}

impl<T: Decompose + ?Sized> Decompose for Box<T> {
    fn decompose_into(&self, sink: &mut ByteSink) {
        (**self).decompose_into(sink);
    }
}
