mod numeric;
pub use self::numeric::*;

mod arithmetic;
pub use self::arithmetic::*;
