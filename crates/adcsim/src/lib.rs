#![doc = include_str!("../README.md")]
//!
//! # Crate layout
//!
//! - [`device`] — the simulated converter itself: [`AdcDevice`] state,
//!   the scan engine, attribute and debug-register access, and the
//!   [`adc_registration`] metadata builder.
//! - [`channel`] — active-channel mask enumeration and per-channel
//!   metadata types.
//! - [`host`] — the host-side seam: the [`ScanDevice`] capability trait
//!   and the handle-based [`DeviceRegistry`].
//!
//! # Example: scanning the built-in sine source
//!
//! With no external buffer, every channel samples one shared sine table
//! with a per-channel phase offset:
//!
//! ```rust
//! use adcsim::{AdcDevice, AdcInitParam, SINE_TABLE, TOTAL_CHANNELS};
//!
//! let mut adc = AdcDevice::new(AdcInitParam::default());
//! adc.set_active_channels(0b0000_0101); // channels 0 and 2
//!
//! let mut out = vec![0u16; 3 * 2];
//! assert_eq!(adc.read_samples(&mut out, 3).unwrap(), 3);
//!
//! // Channel-major within each instant, channels ascending.
//! let offset = SINE_TABLE.len() / TOTAL_CHANNELS;
//! assert_eq!(out[0], SINE_TABLE[0]);          // instant 0, channel 0
//! assert_eq!(out[1], SINE_TABLE[2 * offset]); // instant 0, channel 2
//! assert_eq!(out[2], SINE_TABLE[1]);          // instant 1, channel 0
//! ```
//!
//! # Example: caller-supplied sample data
//!
//! An external channel-major buffer replaces the synthetic source; rows
//! wrap when a scan outruns them:
//!
//! ```rust
//! use adcsim::{AdcDevice, AdcInitParam, ExternalBuffer, TOTAL_CHANNELS};
//!
//! // Four samples per channel; row c holds c*100 .. c*100+3.
//! let data: Vec<u16> = (0..TOTAL_CHANNELS as u16)
//!     .flat_map(|c| (0..4).map(move |i| c * 100 + i))
//!     .collect();
//!
//! let param = AdcInitParam {
//!     ext_buffer: Some(ExternalBuffer::new(&data, 4).unwrap()),
//!     ..AdcInitParam::default()
//! };
//! let mut adc = AdcDevice::new(param);
//! adc.set_active_channels(0b10); // channel 1 only
//!
//! let mut out = vec![0u16; 6];
//! adc.read_samples(&mut out, 6).unwrap();
//! assert_eq!(out, vec![100, 101, 102, 103, 100, 101]); // wraps after 4
//! ```
//!
//! # Example: attribute and register access
//!
//! Configuration travels as decimal text through the host-facing
//! show/store pair; the debug register bank is byte-addressed:
//!
//! ```rust
//! use adcsim::{ADC_CHANNEL_ATTR, AdcDevice, AdcInitParam, ChannelInfo};
//!
//! let mut adc = AdcDevice::new(AdcInitParam::default());
//! let ch3 = ChannelInfo { ch_num: 3 };
//!
//! adc.attr_store(b"411", Some(&ch3), ADC_CHANNEL_ATTR).unwrap();
//! let mut text = [0u8; 16];
//! let n = adc.attr_show(&mut text, Some(&ch3), ADC_CHANNEL_ATTR).unwrap();
//! assert_eq!(&text[..n], b"411");
//!
//! adc.reg_write(0x0A, 0x5A).unwrap();
//! assert_eq!(adc.reg_read(0x0A).unwrap(), 0x5A);
//! ```
mod error;
mod waveform;

pub mod channel;
pub mod device;
pub mod host;

pub use channel::{ActiveChannels, ALL_CHANNELS, TOTAL_CHANNELS, next_active_channel};
pub use device::{
    ADC_CHANNEL_ATTR, ADC_GLOBAL_ATTR, ADC_SCAN_TYPE, AdcDevice, AdcInitParam, ExternalBuffer,
    REG_BANK_SIZE, ScanMode, adc_registration,
};
pub use error::DeviceError;
pub use host::{
    AttrDesc, ChannelInfo, DeviceHandle, DeviceRegistration, DeviceRegistry, ScanDevice,
};
pub use waveform::SINE_TABLE;
