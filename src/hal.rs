//! [`embedded_hal::digital`] traits for [`Pin`].

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

use crate::error::Error;
use crate::pin::{Backend, Pin};

impl<B: Backend> ErrorType for Pin<B> {
    type Error = Error;
}

impl<B: Backend> InputPin for Pin<B> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.read()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.read().map(|v| !v)
    }
}

impl<B: Backend> OutputPin for Pin<B> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

impl<B: Backend> StatefulOutputPin for Pin<B> {
    // the cached level, not a fresh read of the line
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.value()
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.value().map(|v| !v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::pin::Direction;
    use embedded_hal::digital::PinState;

    #[derive(Default)]
    struct Level(bool);

    impl Backend for Level {
        fn apply_direction(&mut self, _id: u32, _direction: Direction) -> Result<()> {
            Ok(())
        }

        fn write_value(&mut self, _id: u32, value: bool) -> Result<()> {
            self.0 = value;
            Ok(())
        }

        fn read_value(&mut self, _id: u32) -> Result<bool> {
            Ok(self.0)
        }

        fn release(&mut self, _id: u32) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn output_traits() {
        let mut pin = Pin::new(4, Direction::Out, false, Level::default()).unwrap();
        assert!(pin.is_set_low().unwrap());
        pin.set_high().unwrap();
        assert!(pin.is_set_high().unwrap());
        pin.set_state(PinState::Low).unwrap();
        assert!(pin.is_low().unwrap());
        pin.toggle().unwrap();
        assert!(pin.is_high().unwrap());
    }

    #[test]
    fn released_pin_reports_other_kind() {
        use embedded_hal::digital::{Error as _, ErrorKind};

        let mut pin = Pin::new(4, Direction::Out, false, Level::default()).unwrap();
        pin.release().unwrap();
        let err = pin.set_high().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.is_disposed());
    }
}
