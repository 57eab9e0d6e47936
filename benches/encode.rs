use std::io::sink;

use criterion::{
	black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
};

use benches::Team;
use protowire::encoder::Config;
use protowire::io::Std;
use protowire::{Encoder, Message, ScratchArena, ScratchContext};

fn flat(c: &mut Criterion) {
	let team = Team::random(32);
	let mut buf = vec![0u8; team.encoded_len()];

	c.bench_function("encode flat", |b| {
		b.iter(|| {
			let mut encoder = Encoder::flat(&mut buf);
			encoder.write_raw_message(black_box(&team)).unwrap();
			encoder.check_no_space_left().unwrap();
		});
	});
}

fn streamed(c: &mut Criterion) {
	let team = Team::random(32);
	let mut group = c.benchmark_group("encode streamed");

	for window_size in [16, 256, Config::DEFAULT_WINDOW_SIZE] {
		group.bench_with_input(
			BenchmarkId::from_parameter(window_size),
			&window_size,
			|b, &window_size| {
				let config = Config::default().with_window_size(window_size);
				b.iter(|| {
					let mut encoder = Encoder::streamed_with_config(
						Std(sink()),
						config.clone(),
					);
					encoder.write_raw_message(black_box(&team)).unwrap();
					encoder.finish().unwrap();
				});
			},
		);
	}

	group.finish();
}

fn buffered(c: &mut Criterion) {
	let team = Team::random(32);
	let mut buf = vec![0u8; team.encoded_len() + 8];

	let mut group = c.benchmark_group("encode buffered");

	group.bench_function("heap", |b| {
		b.iter(|| {
			let mut encoder = Encoder::flat(&mut buf);
			encoder
				.write_message_buffered(
					black_box(&team),
					&mut ScratchContext::new(),
				)
				.unwrap();
		});
	});

	group.bench_function("arena", |b| {
		let mut arena = ScratchArena::checkout();
		b.iter(|| {
			let mut scratch = ScratchContext::with_arena(&mut arena);
			let mut encoder = Encoder::flat(&mut buf);
			encoder
				.write_message_buffered(black_box(&team), &mut scratch)
				.unwrap();
		});
	});

	group.finish();
}

criterion_group!(benches, flat, streamed, buffered);
criterion_main!(benches);
