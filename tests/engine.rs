mod tests {
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    use light_programs::program::{
        DeviceHooks, LightProgram, NullHooks, ProgramError, ProgramId,
    };
    use light_programs::settings::Settings;
    use light_programs::{AudioBridge, Device, Engine, Rgb};

    #[derive(Default, Clone)]
    struct RecordingHooks {
        capture_rates: Rc<RefCell<Vec<u32>>>,
    }

    impl DeviceHooks for RecordingHooks {
        fn set_indicator(&mut self, _on: bool) {}

        fn set_capture_rate(&mut self, ticks_per_second: u32) {
            self.capture_rates.borrow_mut().push(ticks_per_second);
        }
    }

    /// Settings pointing the audio bridge at a throwaway fifo and a child
    /// process that produces no output.
    fn audio_test_settings(dir: &tempfile::TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.ring.led_count = 16;
        settings.audio.bars = 16;
        settings.audio.fifo_path = dir.path().join("spectrum.fifo");
        settings.audio.command = "sleep".into();
        settings.audio.args = vec!["5".into()];
        settings
    }

    #[test]
    fn test_devices_start_disabled() {
        let engine = Engine::new(&Settings::default(), Box::new(NullHooks));
        for device in Device::ALL {
            assert_eq!(engine.program(device), ProgramId::Disabled);
        }
        assert!(matches!(
            engine.ring_colors(),
            Err(ProgramError::Unsupported { .. })
        ));
        assert!(matches!(
            engine.strip_color(),
            Err(ProgramError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_configured_programs_are_applied() {
        let mut settings = Settings::default();
        settings.ring.program = "rainbow".into();
        settings.strip.program = "fixed".into();
        settings.fixed_color = Rgb::new(0.0, 1.0, 0.0);

        let engine = Engine::new(&settings, Box::new(NullHooks));
        assert_eq!(engine.program(Device::Ring), ProgramId::Rainbow);
        assert_eq!(engine.program(Device::Strip), ProgramId::Fixed);
        assert_eq!(engine.program(Device::Wled), ProgramId::Disabled);

        assert_eq!(engine.ring_colors().unwrap().len(), 16);
        assert_eq!(engine.strip_color().unwrap(), Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_fixed_color_can_change() {
        let mut settings = Settings::default();
        settings.ring.program = "fixed".into();

        let mut engine = Engine::new(&settings, Box::new(NullHooks));
        engine.set_fixed_color(Rgb::new(0.5, 0.0, 0.5));
        engine.tick(0.05);
        assert_eq!(
            engine.ring_colors().unwrap(),
            vec![Rgb::new(0.5, 0.0, 0.5); 16]
        );
    }

    #[test]
    fn test_alarm_preempts_fixed_color() {
        let mut settings = Settings::default();
        settings.ring.program = "fixed".into();
        settings.fixed_color = Rgb::WHITE;

        let mut engine = Engine::new(&settings, Box::new(NullHooks));
        engine.begin_alarm();
        // A quarter of the 0.45 second ramp.
        engine.tick(0.1125);

        let colors = engine.ring_colors().unwrap();
        assert!(colors[0].g == 0.0 && colors[0].b == 0.0);
        assert!((colors[0].r - 0.25).abs() < 1e-4);

        engine.end_alarm();
        assert_eq!(engine.alarm_factor(), -1.0);

        // The configured color survives the alarm.
        engine.tick(0.05);
        assert_eq!(engine.ring_colors().unwrap()[0], Rgb::WHITE);
    }

    #[test]
    fn test_rainbow_advances_with_speed() {
        let mut settings = Settings::default();
        settings.ring.program = "rainbow".into();
        settings.program_speed = 2.0;

        let mut engine = Engine::new(&settings, Box::new(NullHooks));
        let before = engine.ring_colors().unwrap();
        engine.tick(0.2);
        let after = engine.ring_colors().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_adaptive_consumers_share_one_analyzer() {
        let dir = tempfile::tempdir().unwrap();
        let settings = audio_test_settings(&dir);
        let fifo_path = settings.audio.fifo_path.clone();
        let hooks = RecordingHooks::default();
        let rates = hooks.capture_rates.clone();

        let mut engine = Engine::new(&settings, Box::new(hooks));
        engine.set_program(Device::Ring, ProgramId::Adaptive).unwrap();
        engine.set_program(Device::Strip, ProgramId::Adaptive).unwrap();

        // One analyzer for both consumers, announced exactly once.
        assert_eq!(rates.borrow().as_slice(), &[20]);
        assert!(fifo_path.exists());

        // Feed one full-scale frame through the pipe and tick it in.
        let mut writer = std::fs::OpenOptions::new()
            .write(true)
            .open(&fifo_path)
            .unwrap();
        writer.write_all(&[255; 16]).unwrap();
        engine.tick(0.05);

        let colors = engine.ring_colors().unwrap();
        // The lowest bar sits in the flat red band at full brightness.
        assert_eq!(colors[0], Rgb::new(1.0, 0.0, 0.0));

        let strip = engine.strip_color().unwrap();
        assert!(strip.r > 0.85 && strip.g > 0.85 && strip.b > 0.85);

        // Releasing both consumers tears the analyzer and the fifo down.
        engine.set_program(Device::Ring, ProgramId::Disabled).unwrap();
        assert!(fifo_path.exists());
        engine.set_program(Device::Strip, ProgramId::Disabled).unwrap();
        assert!(!fifo_path.exists());
    }

    #[test]
    fn test_bridge_identifies_itself_by_name() {
        let bridge = AudioBridge::new(Settings::default().audio);
        assert_eq!(bridge.name(), "audio");
    }

    #[test]
    fn test_spawn_failure_falls_back_to_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = audio_test_settings(&dir);
        settings.audio.command = "/nonexistent/analyzer".into();
        let fifo_path = settings.audio.fifo_path.clone();

        let mut engine = Engine::new(&settings, Box::new(NullHooks));
        let result = engine.set_program(Device::Ring, ProgramId::Adaptive);
        assert!(matches!(result, Err(ProgramError::Spawn(_))));
        assert_eq!(engine.program(Device::Ring), ProgramId::Disabled);
        assert!(!fifo_path.exists());
    }
}
