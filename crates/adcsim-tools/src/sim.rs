//! Subcommand implementations: build a simulated device, drive it through
//! the public API, and print results as tables.

use adcsim::{
    ADC_CHANNEL_ATTR, ADC_GLOBAL_ATTR, ActiveChannels, AdcDevice, AdcInitParam, ChannelInfo,
    ExternalBuffer, REG_BANK_SIZE, TOTAL_CHANNELS,
};
use anyhow::{Context, Result, bail};
use comfy_table::Table;

/// Parse a decimal or 0x-prefixed hex integer.
fn parse_int(text: &str) -> Result<u32> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid integer '{text}'"))
}

/// Scan `samples` instants over `mask` and print an instant x channel table.
pub fn scan(mask: &str, samples: u32, ext: Option<&str>, row_len: Option<usize>) -> Result<()> {
    let mask = parse_int(mask)?;

    let ext_data: Option<Vec<u16>> = ext
        .map(|text| {
            text.split(',')
                .map(|v| {
                    parse_int(v).and_then(|v| {
                        u16::try_from(v).with_context(|| format!("sample '{v}' exceeds 16 bits"))
                    })
                })
                .collect()
        })
        .transpose()?;

    let mut param = AdcInitParam::default();
    if let Some(data) = ext_data.as_deref() {
        let row_len = row_len.context("--ext requires --row-len")?;
        param.ext_buffer = Some(ExternalBuffer::new(data, row_len)?);
    }

    let mut adc = AdcDevice::new(param);
    adc.set_active_channels(mask);

    let active: Vec<usize> = ActiveChannels::new(adc.active_channels()).collect();
    let mut buf = vec![0u16; samples as usize * active.len()];
    let produced = adc.read_samples(&mut buf, samples)?;

    let mut table = Table::new();
    let mut header = vec!["instant".to_string()];
    header.extend(active.iter().map(|ch| format!("ch{ch}")));
    table.set_header(header);

    for (instant, values) in buf.chunks(active.len().max(1)).take(produced as usize).enumerate() {
        let mut row = vec![instant.to_string()];
        row.extend(values.iter().map(|v| format!("0x{v:04X}")));
        table.add_row(row);
    }

    println!("mask 0x{:04X}, {} active channel(s)", adc.active_channels(), active.len());
    println!("{table}");
    Ok(())
}

/// Show (optionally store first) the global or a per-channel attribute.
pub fn attrs(channel: Option<usize>, set: Option<&str>) -> Result<()> {
    if let Some(ch) = channel
        && ch >= TOTAL_CHANNELS
    {
        bail!("channel {ch} out of range (device has {TOTAL_CHANNELS})");
    }

    let mut adc = AdcDevice::new(AdcInitParam::default());
    let info = channel.map(|ch_num| ChannelInfo { ch_num });
    let (attr, name) = match channel {
        Some(_) => (ADC_CHANNEL_ATTR, "adc_channel_attr"),
        None => (ADC_GLOBAL_ATTR, "adc_global_attr"),
    };

    if let Some(value) = set {
        adc.attr_store(value.as_bytes(), info.as_ref(), attr)?;
    }

    let mut text = [0u8; 16];
    let written = adc.attr_show(&mut text, info.as_ref(), attr)?;

    let mut table = Table::new();
    table.set_header(vec!["attribute", "channel", "value"]);
    table.add_row(vec![
        name.to_string(),
        channel.map_or_else(|| "-".to_string(), |ch| ch.to_string()),
        String::from_utf8_lossy(&text[..written]).into_owned(),
    ]);
    println!("{table}");
    Ok(())
}

/// Apply `IDX=VAL` register writes, then dump the whole bank.
pub fn regs(writes: &[String]) -> Result<()> {
    let mut adc = AdcDevice::new(AdcInitParam::default());

    for write in writes {
        let (idx, val) = write
            .split_once('=')
            .with_context(|| format!("expected IDX=VAL, got '{write}'"))?;
        let idx = u8::try_from(parse_int(idx)?).context("register index exceeds 8 bits")?;
        let val = u8::try_from(parse_int(val)?).context("register value exceeds 8 bits")?;
        adc.reg_write(idx, val)
            .with_context(|| format!("register write {write} rejected"))?;
    }

    let mut table = Table::new();
    table.set_header(vec!["register", "value"]);
    for reg in 0..REG_BANK_SIZE as u8 {
        table.add_row(vec![format!("0x{reg:02X}"), format!("0x{:02X}", adc.reg_read(reg)?)]);
    }
    println!("{table}");
    Ok(())
}
