// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use graphxml::{CodecConfig, CodecRegistry, KeyHandler, ModelXmlSerializer, Stylesheet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(xml) = std::str::from_utf8(data) {
        let serializer = ModelXmlSerializer::with_registry(CodecRegistry::global(), CodecConfig::default());

        // Single objects through any registered codec
        let _ = serializer.decode_object(xml);

        // Configure-in-place targets
        let _ = serializer.configure(xml, &mut Stylesheet::new());
        let _ = serializer.configure(xml, &mut KeyHandler::new());
    }
});
