//! Generic `Adaptor` trait for communication channels (serial ports, I²C
//! buses, TCP links, …).

use armada_types::ArmadaError;

/// A connection-specific capability.
///
/// The adaptor's [`name`][Adaptor::name] doubles as the name of the
/// [`Connection`][crate::connection::Connection] wrapping it, which is how
/// drivers refer to the channel they depend on.
pub trait Adaptor: Send + 'static {
    /// Stable identifier, e.g. `"arduino"` or `"loopback"`.
    fn name(&self) -> &str;

    /// Type name reported in connection views, e.g. `"SimAdaptor"`.
    fn kind(&self) -> &str;

    /// Address or port the adaptor talks to, e.g. `"/dev/ttyACM0"`.
    fn port(&self) -> &str;

    /// Open the channel.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::HardwareFault`] if the channel cannot be opened.
    fn connect(&mut self) -> Result<(), ArmadaError> {
        Ok(())
    }

    /// Close the channel and release its resources.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::HardwareFault`] if the channel cannot be closed
    /// cleanly.
    fn finalize(&mut self) -> Result<(), ArmadaError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSerial {
        open: bool,
    }

    impl Adaptor for MockSerial {
        fn name(&self) -> &str {
            "arduino"
        }

        fn kind(&self) -> &str {
            "MockSerial"
        }

        fn port(&self) -> &str {
            "/dev/ttyACM0"
        }

        fn connect(&mut self) -> Result<(), ArmadaError> {
            self.open = true;
            Ok(())
        }

        fn finalize(&mut self) -> Result<(), ArmadaError> {
            self.open = false;
            Ok(())
        }
    }

    #[test]
    fn mock_serial_open_and_close() {
        let mut serial = MockSerial { open: false };
        assert_eq!(serial.name(), "arduino");
        assert_eq!(serial.port(), "/dev/ttyACM0");

        serial.connect().unwrap();
        assert!(serial.open);

        serial.finalize().unwrap();
        assert!(!serial.open);
    }
}
