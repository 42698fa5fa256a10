//! Exporter tests against a small completed run.

#[cfg(test)]
mod exporters {
    use std::io::Cursor;
    use std::path::Path;

    use tempfile::TempDir;

    use mapd_agent::Totp;
    use mapd_core::{FakeClock, Tick};
    use mapd_sim::Simulation;

    const MAP: &str = "3,3\n1\n1\n10\nr..\n...\n..e\n";
    const TASKS: &str = "1\n0 1 0 0 4\n";

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    /// One robot at (0,0) delivering from its home to the endpoint at
    /// (2,2); completes at tick 4.
    fn completed_run() -> (Simulation, Tick) {
        let mut sim =
            mapd_sim::load_readers(Cursor::new(MAP.to_owned()), Cursor::new(TASKS.to_owned()))
                .unwrap();
        let report = sim.run(&Totp, &mut FakeClock::new(0.001), 1_000.0).unwrap();
        (sim, report.end_timestep)
    }

    fn lines_of(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn path_dump_walks_home_to_goal() {
        let (sim, end) = completed_run();
        let dir = tmp();
        let out = dir.path().join("path.txt");
        crate::write_paths_until(&out, &sim, end).unwrap();

        let lines = lines_of(&out);
        assert_eq!(lines[0], "5"); // count line: ticks 0..=4
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "0 0");
        assert_eq!(lines[5], "2 2");

        // Each step moves at most one cell in one axis.
        let coords: Vec<(i64, i64)> = lines[1..]
            .iter()
            .map(|l| {
                let mut it = l.split(' ');
                (
                    it.next().unwrap().parse().unwrap(),
                    it.next().unwrap().parse().unwrap(),
                )
            })
            .collect();
        for pair in coords.windows(2) {
            let dist = (pair[0].0 - pair[1].0).abs() + (pair[0].1 - pair[1].1).abs();
            assert!(dist <= 1, "non-adjacent step {pair:?}");
        }
    }

    #[test]
    fn task_records_list_the_completed_delivery() {
        let (sim, end) = completed_run();
        let dir = tmp();
        let out = dir.path().join("task.txt");
        crate::write_tasks_until(&out, &sim, end).unwrap();

        let lines = lines_of(&out);
        assert_eq!(lines, ["0 0 0 0 2 2 0 4"]);
    }

    #[test]
    fn task_records_omit_deliveries_past_the_cutoff() {
        let (sim, _) = completed_run();
        let dir = tmp();
        let out = dir.path().join("task.txt");
        // Truncating at tick 3 excludes the tick-4 delivery.
        crate::write_tasks_until(&out, &sim, Tick(3)).unwrap();
        assert!(lines_of(&out).is_empty());
    }

    #[test]
    fn throughput_windows_cover_delivery_and_release() {
        let (sim, _) = completed_run();
        let dir = tmp();
        let out = dir.path().join("throughput.txt");
        crate::write_throughput(&out, &sim).unwrap();

        let lines = lines_of(&out);
        assert_eq!(lines.len(), 5_000);
        // Release at tick 0 fills the release column for ticks 0..100;
        // delivery at tick 4 fills the delivery column for ticks 4..104.
        assert_eq!(lines[0], "0 1");
        assert_eq!(lines[4], "1 1");
        assert_eq!(lines[103], "1 0");
        assert_eq!(lines[200], "0 0");
    }

    #[test]
    fn debug_snapshot_backs_up_inputs_and_positions() {
        let (sim, _) = completed_run();
        let dir = tmp();
        let map_path = dir.path().join("map.txt");
        let task_path = dir.path().join("task.txt");
        std::fs::write(&map_path, MAP).unwrap();
        std::fs::write(&task_path, TASKS).unwrap();

        let snap = dir.path().join("snap");
        crate::write_debug_snapshot(&snap, &map_path, &task_path, &sim).unwrap();

        assert_eq!(std::fs::read_to_string(snap.join("map.txt.bak")).unwrap(), MAP);
        assert_eq!(std::fs::read_to_string(snap.join("task.txt.bak")).unwrap(), TASKS);
        assert_eq!(lines_of(&snap.join("debug.txt")), ["0", "0 0"]);
    }
}
