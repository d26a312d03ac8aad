//! Example walking through one simulated host session.
//!
//! This drives an `AdcDevice` through the `DeviceRegistry` exactly the way
//! a host protocol loop would: registration, channel enable, interleaved
//! scans, attribute text round-trips, and debug register pokes.

use adcsim::{
    ADC_CHANNEL_ATTR, ADC_GLOBAL_ATTR, AdcDevice, AdcInitParam, ChannelInfo, DeviceRegistry,
    adc_registration,
};

fn main() {
    let mut registry = DeviceRegistry::new();
    let handle = registry.register(
        adc_registration("adc_demo"),
        Box::new(AdcDevice::new(AdcInitParam::default())),
    );

    // Inspect what the host would see at registration time.
    let registration = registry.registration(handle).unwrap();
    println!(
        "registered '{}' with {} channels",
        registration.name,
        registration.num_channels()
    );
    for ch in registration.channels.iter().take(3) {
        println!(
            "  {} (scan_index {}, {} real bits / {} storage bits)",
            ch.name, ch.scan_index, ch.scan_type.realbits, ch.scan_type.storagebits
        );
    }
    println!("  ...");

    let device = registry.get_mut(handle).unwrap();

    // Enable channels 0, 2 and 5 and pull four sample instants.
    device.enable(0b10_0101).unwrap();
    let mut buf = vec![0u16; 4 * 3];
    let produced = device.read_samples(&mut buf, 4).unwrap();
    println!("\nscan of {} instants over channels {{0, 2, 5}}:", produced);
    for (instant, values) in buf.chunks(3).enumerate() {
        println!("  instant {}: {:?}", instant, values);
    }

    // Attribute access goes through the decimal text path.
    let ch2 = ChannelInfo { ch_num: 2 };
    device.attr_store(b"1250", Some(&ch2), ADC_CHANNEL_ATTR).unwrap();
    device.attr_store(b"7", None, ADC_GLOBAL_ATTR).unwrap();

    let mut text = [0u8; 16];
    let n = device.attr_show(&mut text, Some(&ch2), ADC_CHANNEL_ATTR).unwrap();
    println!(
        "\nadc_channel_attr[2] = {}",
        std::str::from_utf8(&text[..n]).unwrap()
    );
    let n = device.attr_show(&mut text, None, ADC_GLOBAL_ATTR).unwrap();
    println!("adc_global_attr = {}", std::str::from_utf8(&text[..n]).unwrap());

    // Debug registers are plain bytes.
    device.debug_reg_write(0x00, 0xA5).unwrap();
    println!("\nreg[0x00] = 0x{:02X}", device.debug_reg_read(0x00).unwrap());

    // Disable and confirm the device went idle.
    device.disable().unwrap();
    let produced = device.read_samples(&mut buf, 4).unwrap();
    println!("after disable: {} instants, 0 values per instant", produced);

    registry.remove(handle).unwrap();
    println!("device removed, registry empty: {}", registry.is_empty());
}
