use adcsim::{AdcDevice, AdcInitParam, DeviceError, ExternalBuffer, SINE_TABLE, TOTAL_CHANNELS};

/// Channel-major test pattern: row `c` holds `c*1000, c*1000+1, ...`,
/// `row_len` samples per channel.
fn external_pattern(row_len: usize) -> Vec<u16> {
    (0..TOTAL_CHANNELS as u16)
        .flat_map(|c| (0..row_len as u16).map(move |i| c * 1000 + i))
        .collect()
}

#[test]
fn test_empty_mask_returns_instants_and_leaves_buffer_untouched() {
    let adc = AdcDevice::new(AdcInitParam::default());

    let mut out = vec![0xBEEF_u16; 8];
    let produced = adc.read_samples(&mut out, 5).unwrap();

    assert_eq!(produced, 5);
    assert!(out.iter().all(|&v| v == 0xBEEF), "buffer was written");
}

#[test]
fn test_synthetic_single_channel_phase_formula() {
    let offset = SINE_TABLE.len() / TOTAL_CHANNELS;

    for c in [0usize, 1, 7, 15] {
        let mut adc = AdcDevice::new(AdcInitParam::default());
        adc.set_active_channels(1 << c);

        let n = 200; // long enough to wrap the 128-entry table
        let mut out = vec![0u16; n];
        assert_eq!(adc.read_samples(&mut out, n as u32).unwrap(), n as u32);

        for (i, &v) in out.iter().enumerate() {
            assert_eq!(
                v,
                SINE_TABLE[(i + c * offset) % SINE_TABLE.len()],
                "channel {} instant {}",
                c,
                i
            );
        }
    }
}

#[test]
fn test_synthetic_two_channel_interleaving() {
    // Concrete scenario: mask {0, 2}, scan(3) produces six values,
    // channel-major within each instant, channels ascending.
    let offset = SINE_TABLE.len() / TOTAL_CHANNELS;

    let mut adc = AdcDevice::new(AdcInitParam::default());
    adc.set_active_channels(0b0101);

    let mut out = vec![0u16; 6];
    assert_eq!(adc.read_samples(&mut out, 3).unwrap(), 3);

    let expected = vec![
        SINE_TABLE[0],
        SINE_TABLE[2 * offset],
        SINE_TABLE[1],
        SINE_TABLE[1 + 2 * offset],
        SINE_TABLE[2],
        SINE_TABLE[2 + 2 * offset],
    ];
    assert_eq!(out, expected);
}

#[test]
fn test_external_single_channel_with_wraparound() {
    let row_len = 4;
    let data = external_pattern(row_len);

    for c in [0usize, 3, 15] {
        let param = AdcInitParam {
            ext_buffer: Some(ExternalBuffer::new(&data, row_len).unwrap()),
            ..AdcInitParam::default()
        };
        let mut adc = AdcDevice::new(param);
        adc.set_active_channels(1 << c);

        let n = 10; // more than twice the row length
        let mut out = vec![0u16; n];
        adc.read_samples(&mut out, n as u32).unwrap();

        for (i, &v) in out.iter().enumerate() {
            assert_eq!(v, c as u16 * 1000 + (i % row_len) as u16);
        }
    }
}

#[test]
fn test_external_multi_channel_interleaving() {
    let row_len = 3;
    let data = external_pattern(row_len);

    let param = AdcInitParam {
        ext_buffer: Some(ExternalBuffer::new(&data, row_len).unwrap()),
        ..AdcInitParam::default()
    };
    let mut adc = AdcDevice::new(param);
    adc.set_active_channels(0b1010); // channels 1 and 3

    let mut out = vec![0u16; 8];
    assert_eq!(adc.read_samples(&mut out, 4).unwrap(), 4);

    assert_eq!(
        out,
        vec![
            1000, 3000, // instant 0
            1001, 3001, // instant 1
            1002, 3002, // instant 2
            1000, 3000, // instant 3 wraps past row_len
        ]
    );
}

#[test]
fn test_short_destination_fails_without_partial_write() {
    let mut adc = AdcDevice::new(AdcInitParam::default());
    adc.set_active_channels(0b0111); // 3 active channels

    // 4 instants need 12 values; offer 11.
    let mut out = vec![0x5A5A_u16; 11];
    let err = adc.read_samples(&mut out, 4).unwrap_err();

    assert_eq!(err, DeviceError::OutOfRange { index: 12, limit: 11 });
    assert!(out.iter().all(|&v| v == 0x5A5A), "partial write happened");
}

#[test]
fn test_scan_after_disable_produces_nothing() {
    let mut adc = AdcDevice::new(AdcInitParam::default());
    adc.set_active_channels(0b11);

    let mut out = vec![0u16; 16];
    adc.read_samples(&mut out, 8).unwrap();

    adc.clear_active_channels();
    let mut untouched = vec![0xFFFF_u16; 16];
    assert_eq!(adc.read_samples(&mut untouched, 8).unwrap(), 8);
    assert!(untouched.iter().all(|&v| v == 0xFFFF));
}
