use {
    serde::{Deserialize, Deserializer, Serializer, de},
    serde_with::{DeserializeAs, SerializeAs},
    std::borrow::Cow,
};

/// Serialize and deserialize binary data as a `0x` prefixed hexadecimal
/// string.
#[derive(Debug)]
pub struct Hex;

impl<'de, const N: usize> DeserializeAs<'de, [u8; N]> for Hex {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<[u8; N], D::Error> {
        let s = Cow::<str>::deserialize(deserializer)?;
        let hex = s.strip_prefix("0x").ok_or_else(|| {
            de::Error::custom(format!(
                "failed to decode {s:?} as a hex string: missing \"0x\" prefix"
            ))
        })?;

        let mut buffer = [0; N];
        const_hex::decode_to_slice(hex, &mut buffer).map_err(|err| {
            de::Error::custom(format!("failed to decode {s:?} as a hex string: {err}"))
        })?;
        Ok(buffer)
    }
}

impl<const N: usize> SerializeAs<[u8; N]> for Hex {
    fn serialize_as<S: Serializer>(source: &[u8; N], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&const_hex::encode_prefixed(source))
    }
}
