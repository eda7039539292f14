use bytes::{Buf, BufMut};
use streamprims_io::IoStream;

macro_rules! endian_codec {
    ($($read:ident, $write:ident, $ty:ty, $get:ident, $put:ident;)*) => {
        /// Fixed-width integer reads and writes in an explicit byte order.
        ///
        /// Each read issues exactly one stream read of the exact width and
        /// returns `None` on a short count, leaving the value undecoded; the
        /// stream's status tells why. Each write encodes first and issues
        /// exactly one stream write, returning whether the full width went out.
        pub trait EndianExt {
            $(
                fn $read(&mut self) -> Option<$ty>;
                fn $write(&mut self, value: $ty) -> bool;
            )*
        }

        impl EndianExt for IoStream<'_> {
            $(
                fn $read(&mut self) -> Option<$ty> {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    if self.read(&mut raw) != raw.len() {
                        return None;
                    }
                    Some((&raw[..]).$get())
                }

                fn $write(&mut self, value: $ty) -> bool {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    (&mut raw[..]).$put(value);
                    self.write(&raw) == raw.len()
                }
            )*
        }
    };
}

endian_codec! {
    read_u8, write_u8, u8, get_u8, put_u8;
    read_s8, write_s8, i8, get_i8, put_i8;
    read_u16_le, write_u16_le, u16, get_u16_le, put_u16_le;
    read_s16_le, write_s16_le, i16, get_i16_le, put_i16_le;
    read_u16_be, write_u16_be, u16, get_u16, put_u16;
    read_s16_be, write_s16_be, i16, get_i16, put_i16;
    read_u32_le, write_u32_le, u32, get_u32_le, put_u32_le;
    read_s32_le, write_s32_le, i32, get_i32_le, put_i32_le;
    read_u32_be, write_u32_be, u32, get_u32, put_u32;
    read_s32_be, write_s32_be, i32, get_i32, put_i32;
    read_u64_le, write_u64_le, u64, get_u64_le, put_u64_le;
    read_s64_le, write_s64_le, i64, get_i64_le, put_i64_le;
    read_u64_be, write_u64_be, u64, get_u64, put_u64;
    read_s64_be, write_s64_be, i64, get_i64, put_i64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamprims_io::{Status, Whence};

    #[test]
    fn u32_le_extremes() {
        let mut stream = IoStream::from_dynamic_mem();
        for value in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
            assert!(stream.write_u32_le(value));
        }
        stream.seek(0, Whence::Set).unwrap();
        for value in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
            assert_eq!(stream.read_u32_le(), Some(value));
        }
    }

    #[test]
    fn every_width_and_order_round_trips_extremes() {
        macro_rules! round_trip {
            ($($read:ident, $write:ident, $ty:ty;)*) => {$(
                let values = [<$ty>::MIN, 0, <$ty>::MAX];
                let mut stream = IoStream::from_dynamic_mem();
                for value in values {
                    assert!(stream.$write(value), "{}", stringify!($write));
                }
                assert_eq!(
                    stream.size().unwrap(),
                    3 * std::mem::size_of::<$ty>() as u64
                );
                stream.seek(0, Whence::Set).unwrap();
                for value in values {
                    assert_eq!(stream.$read(), Some(value), "{}", stringify!($read));
                }
                assert_eq!(stream.$read(), None);
                assert_eq!(stream.status(), Status::Eof);
            )*};
        }

        round_trip! {
            read_u8, write_u8, u8;
            read_s8, write_s8, i8;
            read_u16_le, write_u16_le, u16;
            read_s16_le, write_s16_le, i16;
            read_u16_be, write_u16_be, u16;
            read_s16_be, write_s16_be, i16;
            read_u32_le, write_u32_le, u32;
            read_s32_le, write_s32_le, i32;
            read_u32_be, write_u32_be, u32;
            read_s32_be, write_s32_be, i32;
            read_u64_le, write_u64_le, u64;
            read_s64_le, write_s64_le, i64;
            read_u64_be, write_u64_be, u64;
            read_s64_be, write_s64_be, i64;
        }
    }

    #[test]
    fn byte_order_on_the_wire() {
        let mut stream = IoStream::from_dynamic_mem();
        assert!(stream.write_u16_le(0x0102));
        assert!(stream.write_u16_be(0x0102));
        assert!(stream.write_u32_be(0x0A0B_0C0D));
        assert!(stream.write_u64_le(0x0102_0304_0506_0708));
        assert_eq!(
            stream.memory().unwrap(),
            &[
                0x02, 0x01, 0x01, 0x02, 0x0A, 0x0B, 0x0C, 0x0D, 0x08, 0x07, 0x06, 0x05, 0x04,
                0x03, 0x02, 0x01
            ]
        );
    }

    #[test]
    fn signed_values_keep_sign() {
        let mut stream = IoStream::from_dynamic_mem();
        assert!(stream.write_s8(-1));
        assert!(stream.write_s16_be(i16::MIN));
        assert!(stream.write_s32_le(-123_456));
        assert!(stream.write_s64_be(i64::MIN + 1));
        stream.seek(0, Whence::Set).unwrap();
        assert_eq!(stream.read_s8(), Some(-1));
        assert_eq!(stream.read_s16_be(), Some(i16::MIN));
        assert_eq!(stream.read_s32_le(), Some(-123_456));
        assert_eq!(stream.read_s64_be(), Some(i64::MIN + 1));
    }

    #[test]
    fn mismatched_order_reads_swapped() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let mut stream = IoStream::from_const_mem(&data).unwrap();
        assert_eq!(stream.read_u32_be(), Some(0x1234_5678));
        stream.seek(0, Whence::Set).unwrap();
        assert_eq!(stream.read_u32_le(), Some(0x7856_3412));
    }

    #[test]
    fn short_read_yields_none() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut stream = IoStream::from_const_mem(&data).unwrap();
        assert_eq!(stream.read_u32_le(), None);
        assert_eq!(stream.status(), Status::Ready);
        assert_eq!(stream.read_u8(), None);
        assert_eq!(stream.status(), Status::Eof);
    }

    #[test]
    fn write_to_read_only_stream_fails() {
        let data = [0u8; 8];
        let mut stream = IoStream::from_const_mem(&data).unwrap();
        assert!(!stream.write_u64_be(42));
        assert_eq!(stream.status(), Status::ReadOnly);
    }

    #[test]
    fn short_write_on_fixed_region() {
        let mut region = [0u8; 3];
        let mut stream = IoStream::from_mem(&mut region).unwrap();
        assert!(!stream.write_u32_le(7));
        assert_eq!(stream.tell().unwrap(), 3);
    }
}
