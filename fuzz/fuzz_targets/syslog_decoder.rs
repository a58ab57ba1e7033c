#![no_main]

use libfuzzer_sys::fuzz_target;
use sysloom_syslog::Message;

fuzz_target!(|data: &[u8]| {
    // 어떤 입력이든 패닉 없이 Message를 반환해야 한다
    let message = Message::decode(data);

    if message.valid() {
        assert!(message.error().is_none());
        assert!(message.priority().is_some());
    } else {
        assert!(message.error().is_some());
    }
});
