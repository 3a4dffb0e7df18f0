use super::SeedMovie;

const BLOCKED_TITLES: &[&str] = &[
    "Dune: Part Two",
    "Joker",
    "Interstellar",
    "Inception",
    "The Dark Knight",
    "Leo",
    "Money Heist",
    "Stranger Things",
    "Breaking Bad",
    "Friends",
    "The Crown",
    "The Social Network",
];

// (title, year, genre, director, plot, poster)
type Row = (&'static str, i32, &'static str, &'static str, &'static str, &'static str);

const MOVIES: &[Row] = &[
    (
        "The Dark Knight",
        2008,
        "Action",
        "Christopher Nolan",
        "Batman faces the Joker, a criminal mastermind who plunges Gotham into chaos.",
        "https://sm.ign.com/t/ign_latam/movie/t/the-dark-k/the-dark-knight_36qc.1200.jpg",
    ),
    (
        "Inception",
        2010,
        "Sci-Fi",
        "Christopher Nolan",
        "A thief who steals corporate secrets through dream-sharing technology is tasked to plant an idea.",
        "https://m.media-amazon.com/images/I/51zUbui+gbL._AC_.jpg",
    ),
    (
        "Interstellar",
        2014,
        "Sci-Fi",
        "Christopher Nolan",
        "Explorers travel through a wormhole to ensure humanity's survival.",
        "https://m.media-amazon.com/images/I/71yAz9T8ZyL._AC_SL1024_.jpg",
    ),
    (
        "The Shawshank Redemption",
        1994,
        "Drama",
        "Frank Darabont",
        "Two imprisoned men bond over years, finding solace and redemption.",
        "https://m.media-amazon.com/images/I/519NBNHX5BL._AC_.jpg",
    ),
    (
        "The Godfather",
        1972,
        "Crime",
        "Francis Ford Coppola",
        "A crime dynasty's aging patriarch transfers control to his reluctant son.",
        "https://m.media-amazon.com/images/I/41+eK8zBwQL._AC_.jpg",
    ),
    (
        "Parasite",
        2019,
        "Thriller",
        "Bong Joon-ho",
        "Class tensions spiral between two families in a gripping thriller.",
        "https://m.media-amazon.com/images/I/71c05lTE03L._AC_SL1024_.jpg",
    ),
    (
        "Gladiator",
        2000,
        "Action / Drama",
        "Ridley Scott",
        "A betrayed Roman general seeks vengeance as a gladiator.",
        "https://m.media-amazon.com/images/M/MV5BYWQ4YmNjYjEtOWE1Zi00Y2U4LWI4NTAtMTU0MjkxNWQ1ZmJiXkEyXkFqcGc@._V1_FMjpg_UX1000_.jpg",
    ),
    (
        "Avengers: Infinity War",
        2018,
        "Action / Sci-Fi",
        "Anthony & Joe Russo",
        "The Avengers battle Thanos to stop his universe-ending plan.",
        "https://images-na.ssl-images-amazon.com/images/I/A1aHRPvn5JL._RI_.jpg",
    ),
    (
        "Joker",
        2019,
        "Drama / Thriller",
        "Todd Phillips",
        "Arthur Fleck's descent into madness births the Joker.",
        "https://i.pinimg.com/originals/95/2e/b0/952eb064b99360a16dc258d3186a7e7f.png",
    ),
    (
        "Titanic",
        1997,
        "Drama / Romance",
        "James Cameron",
        "A tragic romance aboard the ill-fated RMS Titanic.",
        "https://originalvintagemovieposters.com/wp-content/uploads/2020/02/TITANIC-8567-scaled.jpg",
    ),
    (
        "Avatar",
        2009,
        "Sci-Fi / Adventure",
        "James Cameron",
        "A Marine on Pandora is torn between duty and a new home.",
        "https://static1.srcdn.com/wordpress/wp-content/uploads/2023/05/avater-the-way-of-water-poster.jpg",
    ),
    (
        "The Prestige",
        2006,
        "Mystery / Drama",
        "Christopher Nolan",
        "Rival magicians engage in a dangerous battle of wits.",
        "https://c8.alamy.com/comp/DT67F9/hugh-jackman-scarlett-johansson-christian-bale-poster-the-prestige-DT67F9.jpg",
    ),
    (
        "Avengers: Endgame",
        2019,
        "Action / Sci-Fi",
        "Anthony & Joe Russo",
        "The Avengers assemble for a final stand against Thanos.",
        "https://m.media-amazon.com/images/I/81ExhpBEbHL._AC_SL1500_.jpg",
    ),
    (
        "The Wolf of Wall Street",
        2013,
        "Biography / Comedy",
        "Martin Scorsese",
        "Stockbroker Jordan Belfort rises and falls in excess.",
        "http://www.danielyeow.com/wp-content/uploads/TheWolfofWallStreet-poster.jpg",
    ),
    (
        "Dune: Part Two",
        2024,
        "Sci-Fi / Adventure",
        "Denis Villeneuve",
        "Paul Atreides unites with the Fremen to wage war on Arrakis.",
        "https://m.media-amazon.com/images/I/81QYVQxH7lL._AC_SL1500_.jpg",
    ),
    (
        "Oppenheimer",
        2023,
        "Biography / Drama",
        "Christopher Nolan",
        "The story of J. Robert Oppenheimer and the atomic bomb.",
        "https://images.wallpapersden.com/image/download/oppenheimer-2023-movie-poster_bmVpamqUmZqaraWkpJRmZ2dprWZnZ2k.jpg",
    ),
];

pub(super) fn movies() -> Vec<SeedMovie> {
    MOVIES
        .iter()
        .map(|&(title, year, genre, director, plot, poster)| SeedMovie {
            title: title.into(),
            year,
            genre: genre.into(),
            director: director.into(),
            plot: Some(plot.into()),
            poster_url: Some(poster.into()),
        })
        .collect()
}

pub(super) fn blocked_titles() -> Vec<String> {
    BLOCKED_TITLES.iter().map(|t| t.to_string()).collect()
}
