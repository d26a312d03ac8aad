//! Simulated ADC device state and sampling engine.
//!
//! [`AdcDevice`] holds everything one simulated converter owns: the
//! per-channel and global configuration attributes, the active-channel
//! mask, the debug register bank, and (optionally) a borrowed view over
//! externally supplied sample data. All operations are synchronous and
//! atomic: they either complete fully or fail with a [`DeviceError`]
//! leaving the state unmutated.
//!
//! Sample values come from one of two sources, selected once at device
//! creation:
//!
//! - **synthetic** — the built-in [`SINE_TABLE`](crate::SINE_TABLE); channel
//!   `c` reads the table with a phase offset of `c * len / TOTAL_CHANNELS`
//!   entries, giving each channel a time-shifted view of the same waveform;
//! - **external** — a caller-supplied channel-major buffer wrapped in an
//!   [`ExternalBuffer`]; the per-row sample index wraps by the row length.
//!
//! Either way the device copies values verbatim: output words are 16-bit
//! storage holding a right-justified 12-bit signed quantity, and the engine
//! neither rescales nor reinterprets them.

use crate::channel::{
    ActiveChannels, ALL_CHANNELS, ChannelDesc, ChannelType, ScanType, Sign, TOTAL_CHANNELS,
};
use crate::error::DeviceError;
use crate::host::{AttrDesc, ChannelInfo, DeviceRegistration, ScanDevice};
use crate::waveform::{SINE_TABLE, phase_offset};

/// Size of the byte-addressed debug register bank.
pub const REG_BANK_SIZE: usize = 16;

/// Attribute id of the single global configuration value.
pub const ADC_GLOBAL_ATTR: u32 = 0;

/// Attribute id of the per-channel configuration value.
pub const ADC_CHANNEL_ATTR: u32 = 1;

/// Scan type shared by every ADC channel: 12 real bits, signed,
/// right-justified in 16 storage bits, little-endian.
pub const ADC_SCAN_TYPE: ScanType = ScanType {
    sign: Sign::Signed,
    realbits: 12,
    storagebits: 16,
    shift: 0,
    big_endian: false,
};

/// Non-owning, channel-major view over caller-supplied sample data.
///
/// The underlying slice holds one contiguous row of `samples_per_channel`
/// values per channel, [`TOTAL_CHANNELS`] rows in ascending channel order.
/// The device only ever reads through the view; the caller keeps ownership
/// and the borrow keeps the data alive for the lifetime of the device
/// state.
#[derive(Debug, Clone, Copy)]
pub struct ExternalBuffer<'a> {
    data: &'a [u16],
    samples_per_channel: usize,
}

impl<'a> ExternalBuffer<'a> {
    /// Create a view over `data` with `samples_per_channel` values per row.
    ///
    /// Fails with [`DeviceError::AllocationFailure`] when the row length is
    /// zero or `data` is too short to back [`TOTAL_CHANNELS`] full rows.
    pub fn new(data: &'a [u16], samples_per_channel: usize) -> Result<Self, DeviceError> {
        if samples_per_channel == 0 {
            return Err(DeviceError::AllocationFailure(
                "external buffer row length must be non-zero".into(),
            ));
        }
        let needed = TOTAL_CHANNELS * samples_per_channel;
        if data.len() < needed {
            return Err(DeviceError::AllocationFailure(format!(
                "external buffer holds {} samples, {} channels of {} need {}",
                data.len(),
                TOTAL_CHANNELS,
                samples_per_channel,
                needed
            )));
        }
        Ok(ExternalBuffer {
            data,
            samples_per_channel,
        })
    }

    /// Number of samples in each channel row.
    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    /// Value for `channel` at sample instant `index`, wrapping by the row
    /// length when the scan outruns the buffer.
    fn sample(&self, channel: usize, index: usize) -> u16 {
        self.data[channel * self.samples_per_channel + index % self.samples_per_channel]
    }
}

/// Initialization parameters for [`AdcDevice::new`].
#[derive(Debug, Clone, Copy)]
pub struct AdcInitParam<'a> {
    /// Initial per-channel attribute values.
    pub channel_attrs: [u32; TOTAL_CHANNELS],
    /// Initial global attribute value.
    pub global_attr: u32,
    /// External sample data; `None` selects the built-in sine source.
    pub ext_buffer: Option<ExternalBuffer<'a>>,
}

impl Default for AdcInitParam<'_> {
    fn default() -> Self {
        AdcInitParam {
            channel_attrs: [0; TOTAL_CHANNELS],
            global_attr: 0,
            ext_buffer: None,
        }
    }
}

/// Operational mode of a device, derived from the active-channel mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Mask empty; scans produce no values.
    Idle,
    /// Mask non-empty; scans produce values for the active channels.
    Scanning,
}

/// State of one simulated ADC.
///
/// Created once from an [`AdcInitParam`], mutated in place by attribute
/// stores, register writes and mask updates, and dropped normally — the
/// external buffer, being borrowed, is never freed by the device.
pub struct AdcDevice<'a> {
    ext_buffer: Option<ExternalBuffer<'a>>,
    channel_attrs: [u32; TOTAL_CHANNELS],
    global_attr: u32,
    active_mask: u32,
    regs: [u8; REG_BANK_SIZE],
}

impl<'a> AdcDevice<'a> {
    /// Create a device from its initialization parameters. The register
    /// bank starts zeroed and no channels are active.
    pub fn new(param: AdcInitParam<'a>) -> Self {
        AdcDevice {
            ext_buffer: param.ext_buffer,
            channel_attrs: param.channel_attrs,
            global_attr: param.global_attr,
            active_mask: 0,
            regs: [0; REG_BANK_SIZE],
        }
    }

    /// Replace the active-channel mask. Bits at or above [`TOTAL_CHANNELS`]
    /// are cleared, so the stored mask only ever selects real channels.
    pub fn set_active_channels(&mut self, mask: u32) {
        self.active_mask = mask & ALL_CHANNELS;
    }

    /// Clear the active-channel mask; the device goes [`ScanMode::Idle`].
    pub fn clear_active_channels(&mut self) {
        self.active_mask = 0;
    }

    /// Currently active channel mask.
    pub fn active_channels(&self) -> u32 {
        self.active_mask
    }

    /// Current operational mode.
    pub fn scan_mode(&self) -> ScanMode {
        if self.active_mask == 0 {
            ScanMode::Idle
        } else {
            ScanMode::Scanning
        }
    }

    /// Value for `channel` at sample instant `index` from whichever source
    /// the device was created with.
    fn channel_sample(&self, channel: usize, index: usize) -> u16 {
        match &self.ext_buffer {
            Some(ext) => ext.sample(channel, index),
            None => SINE_TABLE[(index + channel * phase_offset()) % SINE_TABLE.len()],
        }
    }

    /// Scan `samples` instants into `out` and return the number of instants
    /// produced.
    ///
    /// For each instant, one value per active channel is appended in
    /// ascending channel order, giving an interleaved sequence of
    /// `samples * popcount(mask)` values. An empty mask is not an error:
    /// the call returns `samples` and writes nothing. Fails with
    /// [`DeviceError::OutOfRange`] — before writing anything — when `out`
    /// cannot hold the full interleaved sequence.
    pub fn read_samples(&self, out: &mut [u16], samples: u32) -> Result<u32, DeviceError> {
        let per_instant = self.active_mask.count_ones() as usize;
        let needed = samples as usize * per_instant;
        if out.len() < needed {
            return Err(DeviceError::OutOfRange {
                index: needed,
                limit: out.len(),
            });
        }

        let mut k = 0;
        for i in 0..samples as usize {
            for ch in ActiveChannels::new(self.active_mask) {
                out[k] = self.channel_sample(ch, i);
                k += 1;
            }
        }
        Ok(samples)
    }

    /// Read one byte from the debug register bank.
    pub fn reg_read(&self, reg: u8) -> Result<u8, DeviceError> {
        self.regs
            .get(reg as usize)
            .copied()
            .ok_or(DeviceError::OutOfRange {
                index: reg as usize,
                limit: REG_BANK_SIZE,
            })
    }

    /// Write one byte to the debug register bank. No side effects beyond
    /// the single addressed byte.
    pub fn reg_write(&mut self, reg: u8, value: u8) -> Result<(), DeviceError> {
        let slot = self
            .regs
            .get_mut(reg as usize)
            .ok_or(DeviceError::OutOfRange {
                index: reg as usize,
                limit: REG_BANK_SIZE,
            })?;
        *slot = value;
        Ok(())
    }

    /// Stored attribute value for `channel`.
    pub fn channel_attr(&self, channel: usize) -> Result<u32, DeviceError> {
        self.channel_attrs
            .get(channel)
            .copied()
            .ok_or(DeviceError::OutOfRange {
                index: channel,
                limit: TOTAL_CHANNELS,
            })
    }

    /// Stored global attribute value.
    pub fn global_attr(&self) -> u32 {
        self.global_attr
    }

    /// Format the attribute identified by `attr` as decimal text into
    /// `out`, returning the number of bytes written.
    ///
    /// Output longer than `out` is truncated at the buffer bound; that
    /// truncation is the only place a result is shortened silently.
    /// Fails with [`DeviceError::UnknownAttribute`] for an unrecognized id
    /// (a per-channel id with no channel context counts as unrecognized)
    /// and [`DeviceError::OutOfRange`] for a bad channel index.
    pub fn attr_show(
        &self,
        out: &mut [u8],
        channel: Option<&ChannelInfo>,
        attr: u32,
    ) -> Result<usize, DeviceError> {
        let value = match attr {
            ADC_GLOBAL_ATTR => self.global_attr,
            ADC_CHANNEL_ATTR => {
                let info = channel.ok_or(DeviceError::UnknownAttribute { id: attr })?;
                self.channel_attr(info.ch_num)?
            }
            _ => return Err(DeviceError::UnknownAttribute { id: attr }),
        };
        let text = value.to_string();
        let written = text.len().min(out.len());
        out[..written].copy_from_slice(&text.as_bytes()[..written]);
        Ok(written)
    }

    /// Parse `input` as decimal text and store it into the attribute
    /// identified by `attr`, returning the number of input bytes consumed
    /// (the full input length on success).
    ///
    /// Parsing is permissive: leading ASCII whitespace is skipped, the
    /// longest digit prefix is taken, and anything unparsable stores 0.
    /// Same error kinds as [`attr_show`](Self::attr_show); state is
    /// untouched on every error path.
    pub fn attr_store(
        &mut self,
        input: &[u8],
        channel: Option<&ChannelInfo>,
        attr: u32,
    ) -> Result<usize, DeviceError> {
        let value = parse_decimal(input);
        match attr {
            ADC_GLOBAL_ATTR => self.global_attr = value,
            ADC_CHANNEL_ATTR => {
                let info = channel.ok_or(DeviceError::UnknownAttribute { id: attr })?;
                let slot = self.channel_attrs.get_mut(info.ch_num).ok_or(
                    DeviceError::OutOfRange {
                        index: info.ch_num,
                        limit: TOTAL_CHANNELS,
                    },
                )?;
                *slot = value;
            }
            _ => return Err(DeviceError::UnknownAttribute { id: attr }),
        }
        Ok(input.len())
    }
}

impl ScanDevice for AdcDevice<'_> {
    fn enable(&mut self, mask: u32) -> Result<(), DeviceError> {
        self.set_active_channels(mask);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), DeviceError> {
        self.clear_active_channels();
        Ok(())
    }

    fn read_samples(&mut self, buf: &mut [u16], samples: u32) -> Result<u32, DeviceError> {
        AdcDevice::read_samples(self, buf, samples)
    }

    fn debug_reg_read(&mut self, reg: u8) -> Result<u8, DeviceError> {
        self.reg_read(reg)
    }

    fn debug_reg_write(&mut self, reg: u8, value: u8) -> Result<(), DeviceError> {
        self.reg_write(reg, value)
    }

    fn attr_show(
        &self,
        buf: &mut [u8],
        channel: Option<&ChannelInfo>,
        attr: u32,
    ) -> Result<usize, DeviceError> {
        AdcDevice::attr_show(self, buf, channel, attr)
    }

    fn attr_store(
        &mut self,
        input: &[u8],
        channel: Option<&ChannelInfo>,
        attr: u32,
    ) -> Result<usize, DeviceError> {
        AdcDevice::attr_store(self, input, channel, attr)
    }
}

/// Best-effort decimal parse used by attribute stores: skip leading ASCII
/// whitespace, take the longest digit run, 0 for anything unparsable.
fn parse_decimal(input: &[u8]) -> u32 {
    let start = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    let digits = input[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    std::str::from_utf8(&input[start..start + digits])
        .ok()
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

/// Build the registration metadata a host consumes for a simulated ADC:
/// sixteen indexed voltage input channels named `adc_in_ch{N}`, all sharing
/// [`ADC_SCAN_TYPE`], one global attribute and one per-channel attribute.
pub fn adc_registration(name: &str) -> DeviceRegistration {
    let channels = (0..TOTAL_CHANNELS)
        .map(|idx| ChannelDesc {
            name: format!("adc_in_ch{idx}"),
            ch_type: ChannelType::Voltage,
            channel: idx,
            scan_index: idx,
            indexed: true,
            scan_type: ADC_SCAN_TYPE,
            out: false,
        })
        .collect();

    DeviceRegistration {
        name: name.to_string(),
        channels,
        global_attributes: vec![AttrDesc {
            name: "adc_global_attr",
            id: ADC_GLOBAL_ATTR,
        }],
        channel_attributes: vec![AttrDesc {
            name: "adc_channel_attr",
            id: ADC_CHANNEL_ATTR,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_permissive() {
        assert_eq!(parse_decimal(b"1234"), 1234);
        assert_eq!(parse_decimal(b"  42\n"), 42);
        assert_eq!(parse_decimal(b"12ab"), 12);
        assert_eq!(parse_decimal(b"ab12"), 0);
        assert_eq!(parse_decimal(b""), 0);
        assert_eq!(parse_decimal(b"99999999999999999999"), 0);
    }
}
