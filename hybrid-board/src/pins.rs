use crate::hal::port::PortExt;

avr_hal_generic::impl_board_pins! {
    #[port_defs]
    use crate::hal::port;

    /// Generic DDR that works for all ports
    pub struct DDR {
        portb: crate::pac::PORTB,
        portc: crate::pac::PORTC,
        portd: crate::pac::PORTD,
    }

    /// Reexport of the hybrid controller's pins, with the names they have
    /// on the hybrid port connector
    pub struct Pins {
        /// `A0`
        ///
        /// * ADC0, analog channel 0
        pub a0: portc::pc0::PC0,
        /// `A1`
        ///
        /// * ADC1, analog channel 1
        pub a1: portc::pc1::PC1,
        /// `A2`
        ///
        /// * ADC2, analog channel 2
        pub a2: portc::pc2::PC2,
        /// `A3`
        ///
        /// * ADC3, analog channel 3
        pub a3: portc::pc3::PC3,

        /// `RX`
        ///
        pub rx: portd::pd0::PD0,
        /// `TX`
        ///
        pub tx: portd::pd1::PD1,
        /// `EN`
        ///
        /// hybrid mode enable, high takes over mode control
        pub en: portd::pd2::PD2,
        /// `IC`
        ///
        /// initial condition mode line
        pub ic: portd::pd3::PD3,
        /// `OP`
        ///
        /// operate mode line
        pub op: portd::pd4::PD4,
        /// `LED`
        ///
        /// on board led, `D13`
        pub led: portb::pb5::PB5,
    }
}
