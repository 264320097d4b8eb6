// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use graphxml::{CodecConfig, CodecRegistry, GraphModel, ModelXmlSerializer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(xml) = std::str::from_utf8(data) {
        let serializer = ModelXmlSerializer::with_registry(CodecRegistry::global(), CodecConfig::default());
        let mut model = GraphModel::new();
        if serializer.import(xml, &mut model).is_ok() {
            let _ = serializer.export(&model);
        }
    }
});
