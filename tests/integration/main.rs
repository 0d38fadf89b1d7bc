//! Host-side integration tests: the control loop driven end to end over
//! recording mock pins, no hardware required.

mod control_loop_tests;
mod mock_pins;
