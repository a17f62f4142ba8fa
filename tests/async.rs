use tagzw::{Decoder, Encoder};
use tokio_util::compat::{TokioAsyncReadCompatExt as _, TokioAsyncWriteCompatExt as _};

#[tokio::test]
async fn async_roundtrip() {
    let data = include_bytes!("../src/lib.rs").repeat(8);

    let mut encoded = Vec::<u8>::new().compat_write();
    let result = Encoder::new()
        .into_async(&mut encoded)
        .encode_all((&data[..]).compat())
        .await;
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(result.bytes_read, data.len());
    let encoded = encoded.into_inner();
    assert_eq!(result.bytes_written, encoded.len());

    let mut decoded = Vec::<u8>::new().compat_write();
    let result = Decoder::new()
        .into_async(&mut decoded)
        .decode_all((&encoded[..]).compat())
        .await;
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(decoded.into_inner(), data);
}

#[tokio::test]
async fn async_rejects_corrupt_stream() {
    let mut decoded = Vec::<u8>::new().compat_write();
    let result = Decoder::new()
        .into_async(&mut decoded)
        .decode_all((&[b'a', 0xc0, 0x00][..]).compat())
        .await;
    assert_eq!(
        result.status.unwrap_err().kind(),
        std::io::ErrorKind::InvalidData
    );
    assert!(decoded.into_inner().is_empty());
}
