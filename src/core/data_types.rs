use crate::errors::OmCodecError;

/// Element type of the caller's array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    Int8 = 0,
    Uint8 = 1,
    Int16 = 2,
    Uint16 = 3,
    Int32 = 4,
    Uint32 = 5,
    Int64 = 6,
    Uint64 = 7,
    Float = 8,
    Double = 9,
}

impl DataType {
    /// Width of one element in the caller's array in bytes.
    pub fn bytes_per_element(&self) -> usize {
        match self {
            DataType::Int8 | DataType::Uint8 => 1,
            DataType::Int16 | DataType::Uint16 => 2,
            DataType::Int32 | DataType::Uint32 | DataType::Float => 4,
            DataType::Int64 | DataType::Uint64 | DataType::Double => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }
}

impl TryFrom<u8> for DataType {
    type Error = OmCodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataType::Int8),
            1 => Ok(DataType::Uint8),
            2 => Ok(DataType::Int16),
            3 => Ok(DataType::Uint16),
            4 => Ok(DataType::Int32),
            5 => Ok(DataType::Uint32),
            6 => Ok(DataType::Int64),
            7 => Ok(DataType::Uint64),
            8 => Ok(DataType::Float),
            9 => Ok(DataType::Double),
            _ => Err(OmCodecError::InvalidDataType),
        }
    }
}

/// Binds a Rust scalar type to its `DataType` tag.
pub trait OmArrayDataType: Copy {
    const DATA_TYPE: DataType;
}

impl OmArrayDataType for i8 {
    const DATA_TYPE: DataType = DataType::Int8;
}
impl OmArrayDataType for u8 {
    const DATA_TYPE: DataType = DataType::Uint8;
}
impl OmArrayDataType for i16 {
    const DATA_TYPE: DataType = DataType::Int16;
}
impl OmArrayDataType for u16 {
    const DATA_TYPE: DataType = DataType::Uint16;
}
impl OmArrayDataType for i32 {
    const DATA_TYPE: DataType = DataType::Int32;
}
impl OmArrayDataType for u32 {
    const DATA_TYPE: DataType = DataType::Uint32;
}
impl OmArrayDataType for i64 {
    const DATA_TYPE: DataType = DataType::Int64;
}
impl OmArrayDataType for u64 {
    const DATA_TYPE: DataType = DataType::Uint64;
}
impl OmArrayDataType for f32 {
    const DATA_TYPE: DataType = DataType::Float;
}
impl OmArrayDataType for f64 {
    const DATA_TYPE: DataType = DataType::Double;
}
