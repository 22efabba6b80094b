//! Frame-array schemas: what one row of frame data looks like.
//!
//! A CHANNEL record defines the channels, a FRAME record groups them into
//! frame arrays; together they fix the byte layout of every subsequent
//! frame-data record until the next logical file.

use hashbrown::HashMap;
use smallvec::SmallVec;

use rp66_error::DecodeError;
use rp66_eflr::{EflrTable, Object, codes};
use rp66_repcode::{RepCode, decode};
use rp66_types::{ByteCursor, ObjectName, Value};
use tracing::warn;

/// One channel of a frame array.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameChannel {
    /// The channel object's name.
    pub name: ObjectName,
    /// Descriptive long name.
    pub long_name: Vec<u8>,
    /// Units of measure.
    pub units: Vec<u8>,
    /// Representation code of every sample.
    pub rep_code: RepCode,
    /// Per-frame value shape; `[1]` for a scalar channel.
    pub dimensions: SmallVec<[u32; 2]>,
}

impl FrameChannel {
    /// Build a channel from one row of a CHANNEL set.
    pub fn from_object(object: &Object) -> Result<Self, DecodeError> {
        let rep_code = object
            .attribute(b"REPRESENTATION-CODE")
            .and_then(|a| a.scalar())
            .and_then(Value::as_u64)
            .and_then(|raw| u8::try_from(raw).ok())
            .and_then(RepCode::from_code)
            .ok_or_else(|| DecodeError::MissingAttribute {
                object: object.name.ident_str(),
                label: "REPRESENTATION-CODE",
            })?;
        if !rep_code.is_numeric() {
            return Err(DecodeError::NonNumericChannel {
                channel: object.name.ident_str(),
                code: rep_code.name(),
            });
        }
        let long_name = object
            .attribute(b"LONG-NAME")
            .and_then(|a| a.scalar())
            .and_then(|v| v.as_bytes().map(<[u8]>::to_vec))
            .unwrap_or_default();
        let units = object
            .attribute(b"UNITS")
            .and_then(|a| a.scalar())
            .and_then(|v| v.as_bytes().map(<[u8]>::to_vec))
            .unwrap_or_default();
        let dimensions: SmallVec<[u32; 2]> = object
            .attribute(b"DIMENSION")
            .and_then(|a| a.value.as_ref())
            .map_or_else(
                || SmallVec::from_slice(&[1]),
                |values| {
                    values
                        .iter()
                        .filter_map(|v| v.as_u64().map(|u| u as u32))
                        .collect()
                },
            );
        Ok(Self {
            name: object.name.clone(),
            long_name,
            units,
            rep_code,
            dimensions,
        })
    }

    /// Samples per frame: the product of the dimensions.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.dimensions.iter().map(|&d| d as usize).product::<usize>().max(1)
    }

    /// Bytes per frame for fixed-width codes, `None` for variable ones.
    #[must_use]
    pub fn frame_width(&self) -> Option<usize> {
        self.rep_code
            .fixed_length()
            .map(|w| w * self.sample_count())
    }

    /// Decode this channel's samples for one frame into `out`.
    fn read_into(&self, ld: &mut ByteCursor<'_>, out: &mut Vec<f64>) -> Result<(), DecodeError> {
        for _ in 0..self.sample_count() {
            let value = decode(self.rep_code, ld)?;
            out.push(value.as_f64().unwrap_or(f64::NAN));
        }
        Ok(())
    }

    /// Skip this channel's samples for one frame.
    fn skip(&self, ld: &mut ByteCursor<'_>) -> Result<(), DecodeError> {
        match self.frame_width() {
            Some(width) => ld.skip(width),
            None => {
                // Variable-width samples must be decoded to find their end.
                for _ in 0..self.sample_count() {
                    decode(self.rep_code, ld)?;
                }
                Ok(())
            }
        }
    }
}

/// One frame array: an ordered channel list whose first channel is the
/// x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameArray {
    /// The frame object's name; frame-data records reference it.
    pub name: ObjectName,
    /// Description from the frame object.
    pub description: Vec<u8>,
    channels: Vec<FrameChannel>,
    index_map: HashMap<ObjectName, usize>,
}

impl FrameArray {
    /// Build a frame array from one row of a FRAME set, resolving its
    /// channel references against a CHANNEL set.
    pub fn from_object(frame_object: &Object, channels: &EflrTable) -> Result<Self, DecodeError> {
        let description = frame_object
            .attribute(b"DESCRIPTION")
            .and_then(|a| a.scalar())
            .and_then(|v| v.as_bytes().map(<[u8]>::to_vec))
            .unwrap_or_default();
        let mut resolved = Vec::new();
        let mut index_map = HashMap::new();
        if let Some(list) = frame_object.attribute(b"CHANNELS").and_then(|a| a.value.as_ref()) {
            for value in list {
                let Some(name) = value.as_name() else {
                    continue;
                };
                let object = channels.object(name).ok_or_else(|| {
                    DecodeError::UnknownChannel {
                        frame_array: frame_object.name.ident_str(),
                        channel: name.ident_str(),
                    }
                })?;
                index_map.insert(name.clone(), resolved.len());
                resolved.push(FrameChannel::from_object(object)?);
            }
        }
        if let Some(x_axis) = resolved.first() {
            if !x_axis.rep_code.is_scalar() {
                return Err(DecodeError::NonScalarIndexChannel {
                    code: x_axis.rep_code.name(),
                });
            }
        }
        Ok(Self {
            name: frame_object.name.clone(),
            description,
            channels: resolved,
            index_map,
        })
    }

    /// The channels in frame order.
    #[must_use]
    pub fn channels(&self) -> &[FrameChannel] {
        &self.channels
    }

    /// The index (x-axis) channel.
    #[must_use]
    pub fn x_axis(&self) -> Option<&FrameChannel> {
        self.channels.first()
    }

    /// Ordinal of a channel by name.
    #[must_use]
    pub fn channel_index(&self, name: &ObjectName) -> Option<usize> {
        self.index_map.get(name).copied()
    }

    /// Decode the x-axis value off the front of one frame's sample bytes.
    ///
    /// For an array channel the first element stands for the frame, as in
    /// the reference implementation.
    pub fn read_x(&self, ld: &mut ByteCursor<'_>) -> Result<f64, DecodeError> {
        let x_axis = self.x_axis().ok_or(DecodeError::ShortData {
            needed: 1,
            remain: 0,
        })?;
        let value = decode(x_axis.rep_code, ld)?;
        Ok(value.as_f64().unwrap_or(f64::NAN))
    }

    /// Decode one frame, appending each selected channel's samples to its
    /// column. `selected` and `columns` are indexed like [`Self::channels`].
    pub fn read_frame(
        &self,
        ld: &mut ByteCursor<'_>,
        selected: &[bool],
        columns: &mut [Vec<f64>],
    ) -> Result<(), DecodeError> {
        for (index, channel) in self.channels.iter().enumerate() {
            if selected.get(index).copied().unwrap_or(false) {
                channel.read_into(ld, &mut columns[index])?;
            } else {
                channel.skip(ld)?;
            }
        }
        if ld.remaining() != 0 {
            warn!(
                frame_array = %self.name,
                remaining = ld.remaining(),
                "frame bytes left over after every channel was read"
            );
        }
        Ok(())
    }
}

/// Every frame array defined by one FRAME/CHANNEL pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogPass {
    arrays: Vec<FrameArray>,
    index_map: HashMap<ObjectName, usize>,
}

impl LogPass {
    /// Build the frame arrays of one logical file from its FRAME and
    /// CHANNEL sets.
    pub fn from_eflrs(frame: &EflrTable, channels: &EflrTable) -> Result<Self, DecodeError> {
        if frame.set.set_type != b"FRAME" {
            return Err(DecodeError::WrongSetType {
                expected: "FRAME",
                got: String::from_utf8_lossy(&frame.set.set_type).into_owned(),
            });
        }
        if channels.set.set_type != b"CHANNEL" {
            return Err(DecodeError::WrongSetType {
                expected: "CHANNEL",
                got: String::from_utf8_lossy(&channels.set.set_type).into_owned(),
            });
        }
        if frame.lr_type != codes::EFLR_FRAME {
            warn!(lr_type = frame.lr_type, "FRAME set on an unexpected record type");
        }
        if channels.lr_type != codes::EFLR_CHANNEL {
            warn!(lr_type = channels.lr_type, "CHANNEL set on an unexpected record type");
        }
        let mut pass = Self::default();
        for frame_object in frame.objects() {
            pass.index_map
                .insert(frame_object.name.clone(), pass.arrays.len());
            pass.arrays.push(FrameArray::from_object(frame_object, channels)?);
        }
        Ok(pass)
    }

    /// The frame arrays in definition order.
    #[must_use]
    pub fn arrays(&self) -> &[FrameArray] {
        &self.arrays
    }

    /// Frame array by name.
    #[must_use]
    pub fn get(&self, name: &ObjectName) -> Option<&FrameArray> {
        self.index_map.get(name).map(|&i| &self.arrays[i])
    }

    /// Number of frame arrays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// True when the pass defines no frame arrays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}
