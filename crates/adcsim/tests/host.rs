use adcsim::channel::{ChannelType, Sign};
use adcsim::{
    ADC_CHANNEL_ATTR, ADC_GLOBAL_ATTR, AdcDevice, AdcInitParam, ChannelInfo, DeviceError,
    DeviceRegistry, ScanDevice, TOTAL_CHANNELS, adc_registration,
};

fn registry_with_device(name: &str) -> (DeviceRegistry<'static>, adcsim::DeviceHandle) {
    let mut registry = DeviceRegistry::new();
    let handle = registry.register(
        adc_registration(name),
        Box::new(AdcDevice::new(AdcInitParam::default())),
    );
    (registry, handle)
}

#[test]
fn test_registration_metadata() {
    let (registry, handle) = registry_with_device("adc_demo");
    let registration = registry.registration(handle).unwrap();

    assert_eq!(registration.name, "adc_demo");
    assert_eq!(registration.num_channels(), TOTAL_CHANNELS);

    for (idx, ch) in registration.channels.iter().enumerate() {
        assert_eq!(ch.name, format!("adc_in_ch{idx}"));
        assert_eq!(ch.ch_type, ChannelType::Voltage);
        assert_eq!(ch.channel, idx);
        assert_eq!(ch.scan_index, idx);
        assert!(ch.indexed);
        assert!(!ch.out);

        assert_eq!(ch.scan_type.sign, Sign::Signed);
        assert_eq!(ch.scan_type.realbits, 12);
        assert_eq!(ch.scan_type.storagebits, 16);
        assert_eq!(ch.scan_type.shift, 0);
        assert!(!ch.scan_type.big_endian);
    }

    assert_eq!(registration.global_attributes.len(), 1);
    assert_eq!(registration.global_attributes[0].name, "adc_global_attr");
    assert_eq!(registration.global_attributes[0].id, ADC_GLOBAL_ATTR);

    assert_eq!(registration.channel_attributes.len(), 1);
    assert_eq!(registration.channel_attributes[0].name, "adc_channel_attr");
    assert_eq!(registration.channel_attributes[0].id, ADC_CHANNEL_ATTR);
}

#[test]
fn test_dispatch_through_trait_object() {
    let (mut registry, handle) = registry_with_device("adc_demo");
    let device: &mut dyn ScanDevice = registry.get_mut(handle).unwrap();

    device.enable(0b11).unwrap();

    let mut buf = vec![0u16; 8];
    assert_eq!(device.read_samples(&mut buf, 4).unwrap(), 4);

    device.debug_reg_write(2, 0x42).unwrap();
    assert_eq!(device.debug_reg_read(2).unwrap(), 0x42);

    let ch = ChannelInfo { ch_num: 1 };
    device.attr_store(b"55", Some(&ch), ADC_CHANNEL_ATTR).unwrap();
    let mut text = [0u8; 8];
    let n = device.attr_show(&mut text, Some(&ch), ADC_CHANNEL_ATTR).unwrap();
    assert_eq!(&text[..n], b"55");

    device.disable().unwrap();
    let mut untouched = vec![0u16; 8];
    assert_eq!(device.read_samples(&mut untouched, 4).unwrap(), 4);
    assert!(untouched.iter().all(|&v| v == 0));
}

#[test]
fn test_lookup_by_name() {
    let mut registry = DeviceRegistry::new();
    let first = registry.register(
        adc_registration("adc0"),
        Box::new(AdcDevice::new(AdcInitParam::default())),
    );
    let second = registry.register(
        adc_registration("adc1"),
        Box::new(AdcDevice::new(AdcInitParam::default())),
    );

    assert_eq!(registry.find("adc0"), Some(first));
    assert_eq!(registry.find("adc1"), Some(second));
    assert_eq!(registry.find("adc2"), None);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_removed_handle_is_no_device() {
    let (mut registry, handle) = registry_with_device("adc_demo");

    registry.remove(handle).unwrap();
    assert!(registry.is_empty());

    assert_eq!(registry.get(handle).err(), Some(DeviceError::NoDevice));
    assert_eq!(registry.get_mut(handle).err(), Some(DeviceError::NoDevice));
    assert_eq!(registry.registration(handle).err(), Some(DeviceError::NoDevice));
    assert_eq!(registry.remove(handle), Err(DeviceError::NoDevice));
    assert_eq!(registry.find("adc_demo"), None);
}

#[test]
fn test_handles_survive_other_removals() {
    let mut registry = DeviceRegistry::new();
    let first = registry.register(
        adc_registration("adc0"),
        Box::new(AdcDevice::new(AdcInitParam::default())),
    );
    let second = registry.register(
        adc_registration("adc1"),
        Box::new(AdcDevice::new(AdcInitParam::default())),
    );

    registry.remove(first).unwrap();

    // The surviving handle still resolves to its own device.
    assert_eq!(registry.registration(second).unwrap().name, "adc1");

    // Vacated slots are not reused: a later registration gets a fresh
    // handle and the stale one keeps failing.
    let third = registry.register(
        adc_registration("adc2"),
        Box::new(AdcDevice::new(AdcInitParam::default())),
    );
    assert_ne!(third, first);
    assert_eq!(registry.registration(third).unwrap().name, "adc2");
    assert_eq!(registry.get(first).err(), Some(DeviceError::NoDevice));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_device_with_borrowed_buffer_in_registry() {
    use adcsim::ExternalBuffer;

    let data: Vec<u16> = (0..TOTAL_CHANNELS as u16 * 2).collect();
    let param = AdcInitParam {
        ext_buffer: Some(ExternalBuffer::new(&data, 2).unwrap()),
        ..AdcInitParam::default()
    };

    let mut registry = DeviceRegistry::new();
    let handle = registry.register(adc_registration("adc_ext"), Box::new(AdcDevice::new(param)));

    let device = registry.get_mut(handle).unwrap();
    device.enable(0b1).unwrap();
    let mut buf = vec![0u16; 4];
    device.read_samples(&mut buf, 4).unwrap();
    assert_eq!(buf, vec![0, 1, 0, 1]);

    // Removal drops the device state; the borrowed data stays with us.
    registry.remove(handle).unwrap();
    assert_eq!(data.len(), TOTAL_CHANNELS * 2);
}
