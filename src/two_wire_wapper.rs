use core::fmt::{self, Debug};

use embedded_hal::i2c::{Error, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// 应答位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Ack,
    Nack,
}

/// 最底层的两线（TWI）总线驱动
///
/// 只提供起始、停止、单字节收发这几个原语，没有实现 `embedded_hal::i2c::I2c` 的固件用
/// [`TwoWireWapper`] 包装后即可使用传感器驱动。
pub trait TwoWire {
    /// 发送起始条件和地址字节（7位地址左移1位，最低位为读写位）
    fn start(&mut self, address_byte: u8) -> Ack;

    /// 发送1个字节
    fn write_byte(&mut self, value: u8) -> Ack;

    /// 接收1个字节并应答
    fn read_byte_ack(&mut self) -> u8;

    /// 接收1个字节不应答（一次读取的最后一个字节）
    fn read_byte_nack(&mut self) -> u8;

    /// 发送停止条件
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoWireWapperError {
    /// 从设备没有应答地址字节
    AddressNack,
    /// 从设备没有应答数据字节
    DataNack,
}

impl Error for TwoWireWapperError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::AddressNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Self::DataNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
        }
    }
}

impl fmt::Display for TwoWireWapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl core::error::Error for TwoWireWapperError {}

/// Two Wire Wapper
pub struct TwoWireWapper<T> {
    bus: T,
}

impl<T: TwoWire> TwoWireWapper<T> {
    pub fn new(bus: T) -> Self {
        Self { bus }
    }

    pub fn release(self) -> T {
        self.bus
    }

    fn start(&mut self, address: u8, read: bool) -> Result<(), TwoWireWapperError> {
        if self.bus.start((address << 1) | read as u8) == Ack::Nack {
            self.bus.stop();
            return Err(TwoWireWapperError::AddressNack);
        }
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TwoWireWapperError> {
        for &byte in bytes {
            if self.bus.write_byte(byte) == Ack::Nack {
                self.bus.stop();
                return Err(TwoWireWapperError::DataNack);
            }
        }
        Ok(())
    }

    /// `last_in_run` 为true时最后一个字节不应答
    fn read_bytes(&mut self, buffer: &mut [u8], last_in_run: bool) {
        let length = buffer.len();
        for (index, byte) in buffer.iter_mut().enumerate() {
            *byte = if last_in_run && index + 1 == length {
                self.bus.read_byte_nack()
            } else {
                self.bus.read_byte_ack()
            };
        }
    }
}

impl<T> ErrorType for TwoWireWapper<T> {
    type Error = TwoWireWapperError;
}

impl<T: TwoWire> I2c for TwoWireWapper<T> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        // 上一个操作的方向（true为读）
        let mut previous: Option<bool> = None;

        for index in 0..operations.len() {
            let read = matches!(operations[index], Operation::Read(_));
            let next_read = matches!(operations.get(index + 1), Some(Operation::Read(_)));

            // 方向改变时发送（重复）起始条件
            if previous != Some(read) {
                self.start(address, read)?;
            }

            match &mut operations[index] {
                Operation::Write(bytes) => self.write_bytes(bytes)?,
                Operation::Read(buffer) => self.read_bytes(buffer, !next_read),
            }

            previous = Some(read);
        }

        if previous.is_some() {
            self.bus.stop();
        }

        // OK
        Ok(())
    }
}
