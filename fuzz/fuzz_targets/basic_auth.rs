#![no_main]

use libfuzzer_sys::fuzz_target;
use testrack_api::Credentials;

fuzz_target!(|data: &[u8]| {
    // 헤더 값은 &str로 전달되므로 UTF-8 변환 필요
    if let Ok(header) = std::str::from_utf8(data) {
        let credentials = Credentials::new("admin", "123");
        let accepted = credentials.verify(header);
        if accepted {
            let expected = credentials.header_value();
            let token = &expected["Basic ".len()..];
            assert!(header.contains(token), "accepted header without the exact token");
        }
    }
});
