mod tests {
    use light_programs::program::{
        DeviceHooks, Lifecycle, LightProgram, NullHooks, ProgramError,
    };

    #[derive(Default)]
    struct Probe {
        state: Lifecycle,
        fail_start: bool,
        starts: u32,
        stops: u32,
    }

    impl LightProgram for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn lifecycle(&self) -> &Lifecycle {
            &self.state
        }

        fn lifecycle_mut(&mut self) -> &mut Lifecycle {
            &mut self.state
        }

        fn start(&mut self, _hooks: &mut dyn DeviceHooks) -> Result<(), ProgramError> {
            if self.fail_start {
                return Err(ProgramError::Unsupported { program: "probe" });
            }
            self.starts += 1;
            Ok(())
        }

        fn stop(&mut self, _hooks: &mut dyn DeviceHooks) {
            self.stops += 1;
        }
    }

    #[test]
    fn test_starts_on_first_acquire_only() {
        let mut hooks = NullHooks;
        let mut probe = Probe::default();

        probe.acquire(&mut hooks).unwrap();
        probe.acquire(&mut hooks).unwrap();
        assert_eq!(probe.starts, 1);
        assert_eq!(probe.lifecycle().consumers(), 2);
        assert!(probe.is_active());
    }

    #[test]
    fn test_stops_after_last_release() {
        let mut hooks = NullHooks;
        let mut probe = Probe::default();

        probe.acquire(&mut hooks).unwrap();
        probe.acquire(&mut hooks).unwrap();
        probe.release(&mut hooks);
        assert_eq!(probe.stops, 0);
        probe.release(&mut hooks);
        assert_eq!(probe.stops, 1);
        assert!(!probe.is_active());
    }

    #[test]
    fn test_failed_start_leaves_count_at_zero() {
        let mut hooks = NullHooks;
        let mut probe = Probe {
            fail_start: true,
            ..Probe::default()
        };

        assert!(probe.acquire(&mut hooks).is_err());
        assert_eq!(probe.lifecycle().consumers(), 0);

        // The program can be retried once the failure cause is gone.
        probe.fail_start = false;
        probe.acquire(&mut hooks).unwrap();
        assert_eq!(probe.starts, 1);
        assert_eq!(probe.lifecycle().consumers(), 1);
    }

    #[test]
    fn test_release_without_acquire_is_ignored() {
        let mut hooks = NullHooks;
        let mut probe = Probe::default();

        probe.release(&mut hooks);
        assert_eq!(probe.lifecycle().consumers(), 0);
        assert_eq!(probe.stops, 0);
    }
}
