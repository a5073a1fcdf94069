mod hex;

pub use self::hex::Hex;
