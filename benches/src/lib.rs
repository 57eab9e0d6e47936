use protowire::io::Write;
use protowire::size::{
	compute_fixed64_size, compute_message_size, compute_string_size,
	compute_tag_size, compute_uint64_size,
};
use protowire::{EncodeError, Message, WireType, WriteContext};
use rand::Rng;

fn random_str(len: usize) -> String {
	rand::thread_rng()
		.sample_iter(&rand::distributions::Alphanumeric)
		.take(len)
		.map(char::from)
		.collect()
}

fn random_friends() -> Vec<u64> {
	(0..5).map(|_| rand::random()).collect::<Vec<u64>>()
}

#[derive(Debug, Clone)]
pub struct Player {
	id: u64,
	name: String,
	friends: Vec<u64>,
	score: f64,
}

impl Player {
	pub fn random() -> Self {
		Self {
			id: rand::random(),
			name: random_str(12),
			friends: random_friends(),
			score: rand::random(),
		}
	}
}

impl Message for Player {
	fn encoded_len(&self) -> usize {
		let friends: usize = self
			.friends
			.iter()
			.map(|&x| compute_tag_size(3) + compute_uint64_size(x))
			.sum();

		compute_tag_size(1)
			+ compute_uint64_size(self.id)
			+ compute_tag_size(2)
			+ compute_string_size(&self.name)
			+ friends
			+ compute_tag_size(4)
			+ compute_fixed64_size(0)
	}

	fn write_to<W: Write>(
		&self,
		ctx: &mut WriteContext<'_, '_, W>,
	) -> Result<(), EncodeError<W::Error>> {
		ctx.write_tag(1, WireType::Varint)?;
		ctx.write_uint64(self.id)?;
		ctx.write_tag(2, WireType::LengthDelimited)?;
		ctx.write_string(&self.name)?;
		for &friend in &self.friends {
			ctx.write_tag(3, WireType::Varint)?;
			ctx.write_uint64(friend)?;
		}
		ctx.write_tag(4, WireType::Fixed64)?;
		ctx.write_double(self.score)
	}
}

#[derive(Debug, Clone)]
pub struct Team {
	name: String,
	players: Vec<Player>,
}

impl Team {
	pub fn random(size: usize) -> Self {
		Self {
			name: random_str(24),
			players: (0..size).map(|_| Player::random()).collect(),
		}
	}
}

impl Message for Team {
	fn encoded_len(&self) -> usize {
		let players: usize = self
			.players
			.iter()
			.map(|p| compute_tag_size(2) + compute_message_size(p))
			.sum();

		compute_tag_size(1) + compute_string_size(&self.name) + players
	}

	fn write_to<W: Write>(
		&self,
		ctx: &mut WriteContext<'_, '_, W>,
	) -> Result<(), EncodeError<W::Error>> {
		ctx.write_tag(1, WireType::LengthDelimited)?;
		ctx.write_string(&self.name)?;
		for player in &self.players {
			ctx.write_tag(2, WireType::LengthDelimited)?;
			ctx.write_message(player)?;
		}
		Ok(())
	}
}
